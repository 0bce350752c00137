//! Property tests for the token codec.

use chrono::Duration;
use keystone::auth::{TokenCodec, TokenConfig, TokenKind};
use proptest::prelude::*;

fn codec() -> TokenCodec {
    TokenCodec::new(TokenConfig {
        access_secret: "access_secret_for_tests_0123456789ab".to_string(),
        refresh_secret: "refresh_secret_for_tests_0123456789a".to_string(),
        access_ttl: Duration::minutes(15),
        refresh_ttl: Duration::days(7),
    })
}

proptest! {
    /// Any user id round-trips under the kind it was issued as.
    #[test]
    fn round_trips_any_user_id(user_id in any::<i64>()) {
        let codec = codec();

        for kind in [TokenKind::Access, TokenKind::Refresh] {
            let token = codec.issue(user_id, kind).unwrap();
            let claims = codec.verify(&token, kind).unwrap();
            prop_assert_eq!(claims.user.id, user_id);
        }
    }

    /// No token ever verifies under the other kind.
    #[test]
    fn never_verifies_under_other_kind(user_id in any::<i64>()) {
        let codec = codec();

        let access = codec.issue(user_id, TokenKind::Access).unwrap();
        let refresh = codec.issue(user_id, TokenKind::Refresh).unwrap();
        prop_assert!(codec.verify(&access, TokenKind::Refresh).is_err());
        prop_assert!(codec.verify(&refresh, TokenKind::Access).is_err());
    }
}
