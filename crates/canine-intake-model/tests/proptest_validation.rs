// SPDX-License-Identifier: Apache-2.0

use canine_intake_model::{looks_like_email, require_non_blank, SessionPack, SESSION_PACKS};
use proptest::prelude::*;
use proptest::test_runner::Config;

proptest! {
    #![proptest_config(Config::with_cases(128))]
    #[test]
    fn well_formed_addresses_pass(
        local in "[a-z0-9._+]{1,20}",
        host in "[a-z0-9]{1,12}",
        tld in "[a-z]{2,6}"
    ) {
        let email = format!("{local}@{host}.{tld}");
        prop_assert!(looks_like_email(&email));
    }

    #[test]
    fn whitespace_only_is_always_blank(ws in "[ \t\r\n]{0,12}") {
        prop_assert!(require_non_blank("field", &ws).is_err());
    }

    #[test]
    fn unknown_session_counts_have_no_pack(n in 0_u32..1000) {
        let known = SESSION_PACKS.iter().any(|p| p.sessions == n);
        prop_assert_eq!(SessionPack::for_sessions(n).is_some(), known);
    }
}
