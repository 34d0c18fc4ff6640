use recon_probe_rs::ports::{banner_ports, default_ports, parse_ports_str, well_known_service};

#[test]
fn parse_single_and_ranges_and_comments() {
    let input = r#"
        # common ports
        22
        80  # http
        443 # https
        8000-8002
        8001  # duplicate
        # blank line follows

    "#;

    let ports = parse_ports_str(input).expect("parse ok");
    // Dedup, preserve insertion order of first appearance in each range/line
    assert_eq!(ports, vec![22, 80, 443, 8000, 8001, 8002]);
}

#[test]
fn parse_inline_comma_spec() {
    let ports = parse_ports_str("21,22,80,8000-8001").expect("parse ok");
    assert_eq!(ports, vec![21, 22, 80, 8000, 8001]);
}

#[test]
fn invalid_port_rejected() {
    let input = "0\n"; // invalid: out of range
    assert!(parse_ports_str(input).is_err());
}

#[test]
fn defaults_cover_the_banner_sweep() {
    let all = default_ports();
    for p in banner_ports() {
        assert!(all.contains(&p), "default ports missing {p}");
    }
}

#[test]
fn service_names_for_banner_ports() {
    for p in banner_ports() {
        assert!(well_known_service(p).is_some(), "no service name for {p}");
    }
}
