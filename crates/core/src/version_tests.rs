// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn zero_is_not_a_version() {
    assert!(Version::new(0).is_none());
    assert_eq!(Version::new(1), Some(Version::FIRST));
}

#[test]
fn previous_of_first_is_none() {
    assert_eq!(Version::FIRST.previous(), None);
    assert_eq!(Version::new(3).unwrap().previous(), Version::new(2));
}

#[test]
fn compares_against_raw_on_disk_numbers() {
    let v4 = Version::new(4).unwrap();
    assert!(v4 == 4);
    assert!(v4 > 3);
    assert!(v4 < 5);
}

#[test]
fn display_prefixes_v() {
    assert_eq!(Version::new(6).unwrap().to_string(), "v6");
}

#[test]
fn serializes_as_bare_number() {
    let json = serde_json::to_string(&Version::new(5).unwrap()).unwrap();
    assert_eq!(json, "5");
}

#[test]
fn deserialize_rejects_zero() {
    assert_eq!(serde_json::from_str::<Version>("4").unwrap(), Version::new(4).unwrap());
    assert!(serde_json::from_str::<Version>("0").is_err());
    assert_eq!(Version::try_from(0), Err(ZeroVersion));
}
