use super::*;

#[test]
fn full_name_gives_one_letter_per_word() {
    assert_eq!(initials(Some("Ada Lovelace"), "ada@x.io"), "AL");
    assert_eq!(initials(Some("grace brewster murray hopper"), "g@x.io"), "GBMH");
}

#[test]
fn extra_whitespace_is_ignored() {
    assert_eq!(initials(Some("  ken   thompson "), "k@x.io"), "KT");
}

#[test]
fn blank_or_missing_name_falls_back_to_email() {
    assert_eq!(initials(None, "zoe@x.io"), "Z");
    assert_eq!(initials(Some("   "), "zoe@x.io"), "Z");
    assert_eq!(initials(Some(""), "bob@x.io"), "B");
}

#[test]
fn nothing_to_go_on_gives_u() {
    assert_eq!(initials(None, ""), "U");
    assert_eq!(initials(Some(" "), "  "), "U");
}
