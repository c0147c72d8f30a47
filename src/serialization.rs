use serde::{Deserialize, Serialize};

use crate::rings::poly::DEFAULT_GEN_NAME;

fn default_gen_name() -> String {
    DEFAULT_GEN_NAME.to_owned()
}

///
/// The configuration of a polynomial ring, as it can be stored and restored independently
/// of the base ring. Use [`crate::rings::poly::poly_config()`] to read it from a ring, and
/// [`crate::rings::poly::poly_ring_with()`] to create a ring from it.
///
/// An absent generator name defaults to `x`, and an absent degree limit means that the
/// ring has no degree ceiling.
///
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PolyRingConfig {
    #[serde(default = "default_gen_name")]
    pub gen_name: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub degree_limit: Option<usize>
}

impl Default for PolyRingConfig {

    fn default() -> Self {
        PolyRingConfig { gen_name: default_gen_name(), degree_limit: None }
    }
}

#[test]
fn test_serialize_config() {
    let config = PolyRingConfig { gen_name: "t".to_owned(), degree_limit: Some(16) };
    let serialized = serde_json::to_string(&config).unwrap();
    assert_eq!(r#"{"gen_name":"t","degree_limit":16}"#, serialized);
    assert_eq!(config, serde_json::from_str::<PolyRingConfig>(&serialized).unwrap());

    let serialized = serde_json::to_string(&PolyRingConfig::default()).unwrap();
    assert_eq!(r#"{"gen_name":"x"}"#, serialized);
    assert_eq!(PolyRingConfig::default(), serde_json::from_str::<PolyRingConfig>("{}").unwrap());
}

#[test]
fn test_restore_ring_from_config() {
    use std::sync::Arc;
    use crate::rings::poly::{poly_config, poly_ring_with, degree_limit};
    use crate::rings::zn::zn;

    let config = serde_json::from_str::<PolyRingConfig>(r#"{"gen_name":"y","degree_limit":3}"#).unwrap();
    let ring = poly_ring_with(Arc::new(zn(5)), &config).unwrap();
    assert_eq!(Some(3), degree_limit(&ring));
    assert_eq!(config, poly_config(&ring));
    assert_eq!("Ring of polynomials over Integers mod 5", format!("{}", ring));
}
