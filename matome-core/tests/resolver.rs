use matome_core::{
    AuthPlacement, ServiceName, Subscription, Transport, discriminator, resolve,
};

#[test]
fn resolution_is_pure() {
    let sub = Subscription::new(ServiceName::Tenki).with_token("1000001");
    let a = resolve(&sub);
    let b = resolve(&sub);
    assert_eq!(a, b);
}

#[test]
fn ken2_zipcode_comes_from_first_key() {
    let sub = Subscription::new(ServiceName::Ken2)
        .with_keys(["1000001", "1630001"])
        .with_param("zipcode", "9999999");
    let d = resolve(&sub);
    assert_eq!(d.query.get("zipcode").map(String::as_str), Some("1000001"));
    assert!(d.headers.is_empty());
    assert_eq!(discriminator(ServiceName::Ken2, &d), Some("1000001"));
}

#[test]
fn ken2_falls_back_to_zipcode_param() {
    let sub = Subscription::new(ServiceName::Ken2).with_param("zipcode", "1630001");
    let d = resolve(&sub);
    assert_eq!(d.query.get("zipcode").map(String::as_str), Some("1630001"));
}

#[test]
fn tenki_token_lands_in_zipcode_query() {
    let sub = Subscription::new(ServiceName::Tenki)
        .with_token("1000001")
        .with_param("zipcode", "1630001");
    let d = resolve(&sub);
    // Token wins over the param fallback.
    assert_eq!(d.query.get("zipcode").map(String::as_str), Some("1000001"));
    assert_eq!(discriminator(ServiceName::Tenki, &d), Some("1000001"));
}

#[test]
fn tenki_param_is_the_fallback_without_token() {
    let sub = Subscription::new(ServiceName::Tenki).with_param("zipcode", "1630001");
    let d = resolve(&sub);
    assert_eq!(d.query.get("zipcode").map(String::as_str), Some("1630001"));
}

#[test]
fn surname_query_term_discriminates() {
    let sub = Subscription::new(ServiceName::Surname).with_param("q", "sato");
    let d = resolve(&sub);
    assert_eq!(d.uri, "http://api.five-final.isucon.net:8081/surname");
    assert_eq!(discriminator(ServiceName::Surname, &d), Some("sato"));
}

#[test]
fn perfectsec_token_lands_in_header() {
    let sub = Subscription::new(ServiceName::Perfectsec).with_token("secret");
    let d = resolve(&sub);
    assert_eq!(
        d.headers.get("X-PERFECT-SECURITY-TOKEN").map(String::as_str),
        Some("secret")
    );
    assert!(d.query.is_empty());
    assert_eq!(discriminator(ServiceName::Perfectsec, &d), None);
    assert_eq!(ServiceName::Perfectsec.transport(), Transport::Tls);
}

#[test]
fn token_is_ignored_without_auth_placement() {
    let sub = Subscription::new(ServiceName::Surname)
        .with_token("secret")
        .with_param("q", "sato");
    assert_eq!(ServiceName::Surname.endpoint().auth, AuthPlacement::None);
    let d = resolve(&sub);
    assert!(d.headers.is_empty());
    assert!(!d.query.contains_key("token"));
}
