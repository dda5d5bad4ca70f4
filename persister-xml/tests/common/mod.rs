use persister::Persister;

/// The hierarchical tree used across the XML tests.
pub fn hierarchical() -> Persister {
    persister_testhelpers::setup();

    let mut p = Persister::new();
    p.put_int("x", 42).unwrap();
    p.put_int("y", 84).unwrap();
    p.put_string("x", "xylophone").unwrap();
    p.put_string("z", "zebra").unwrap();
    p.put_long("now", 1_699_999_999_999).unwrap();
    p.put_double("x", 0.25).unwrap();
    p.put_double("w", 12345.6789).unwrap();

    let c1 = p.new_child("c").unwrap();
    c1.put_int("x", 32).unwrap();
    c1.put_string("fruit", "apple").unwrap();

    let c2 = p.new_child("c").unwrap();
    c2.put_int("x", 16).unwrap();
    c2.put_string("fruit", "banana").unwrap();
    c2.new_child("c2")
        .unwrap()
        .put_string("color", "yellow")
        .unwrap();

    p.new_child("empty").unwrap();
    p
}
