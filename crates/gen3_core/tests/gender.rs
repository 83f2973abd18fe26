use gen3_core::gender::Gender;

#[test]
fn maps_known_gender_values() {
    assert_eq!(Gender::from_raw(0), Gender::Male);
    assert_eq!(Gender::from_raw(1), Gender::Female);
}

#[test]
fn preserves_unknown_values() {
    assert_eq!(Gender::from_raw(2), Gender::Unknown(2));
    assert_eq!(Gender::from_raw(0xFF).raw(), 0xFF);
}

#[test]
fn only_female_sets_the_origin_bit() {
    assert_eq!(Gender::Male.origin_bit(), 0);
    assert_eq!(Gender::Female.origin_bit(), 1);
    assert_eq!(Gender::Unknown(7).origin_bit(), 0);
    assert_eq!(Gender::Female.to_string(), "Girl");
}
