//! Property tests for access laws that must hold for any configuration

use acl_manager::{AclConfig, AclManager, AclType, ApplicationAccessType, StaticGroupProvider};
use proptest::prelude::*;
use std::sync::Arc;

const USERS: [&str; 5] = ["alice", "bob", "carol", "dave", "erin"];
const GROUPS: [&str; 3] = ["eng", "ops", "qa"];

fn directory() -> Arc<StaticGroupProvider> {
    Arc::new(
        StaticGroupProvider::new()
            .with_user("alice", ["eng"])
            .with_user("bob", ["ops"])
            .with_user("carol", ["eng", "qa"])
            .with_user("dave", ["qa"]),
    )
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

/// ACL value in the `"<users> <groups>"` format, optionally with a wildcard
fn acl_value() -> impl Strategy<Value = String> {
    (
        proptest::sample::subsequence(USERS.to_vec(), 0..=3),
        proptest::sample::subsequence(GROUPS.to_vec(), 0..=2),
        proptest::bool::weighted(0.1),
    )
        .prop_map(|(users, groups, wildcard)| {
            let mut users = users.join(",");
            if wildcard {
                users = "*".to_string();
            }
            format!("{} {}", users, groups.join(","))
        })
}

fn acl_config() -> impl Strategy<Value = AclConfig> {
    (
        proptest::option::of(acl_value()),
        proptest::option::of(acl_value()),
        proptest::option::of(acl_value()),
        proptest::option::of(acl_value()),
    )
        .prop_map(|(am_view, am_modify, dag_view, dag_modify)| AclConfig {
            am_view_acls: am_view,
            am_modify_acls: am_modify,
            dag_view_acls: dag_view,
            dag_modify_acls: dag_modify,
            ..AclConfig::default()
        })
}

fn principal() -> impl Strategy<Value = String> {
    prop_oneof![
        proptest::sample::select(USERS.to_vec()).prop_map(String::from),
        "[a-z]{1,8}",
    ]
}

proptest! {
    #[test]
    fn prop_disabled_grants_everything(config in acl_config(), user in principal()) {
        let config = config.disabled();
        let am = AclManager::new(directory(), "admin", Some(&config)).unwrap();
        let dag = am.derive(Some("owner"), Some(&config)).unwrap();

        runtime().block_on(async {
            for acl_type in AclType::ALL {
                assert!(am.check_access(&user, acl_type).await);
                assert!(dag.check_access(&user, acl_type).await);
            }
        });

        let acls = am.to_application_acls();
        prop_assert_eq!(&acls[&ApplicationAccessType::ViewApp], "*");
        prop_assert_eq!(&acls[&ApplicationAccessType::ModifyApp], "*");
    }

    #[test]
    fn prop_am_owner_always_granted(config in acl_config(), dag_config in acl_config()) {
        let am = AclManager::new(directory(), "admin", Some(&config)).unwrap();
        let dag = am.derive(Some("owner"), Some(&dag_config)).unwrap();

        runtime().block_on(async {
            for acl_type in AclType::ALL {
                assert!(am.check_access("admin", acl_type).await);
                assert!(dag.check_access("admin", acl_type).await);
            }
        });
    }

    #[test]
    fn prop_am_modify_implies_dag_modify(
        config in acl_config(),
        dag_config in acl_config(),
        user in principal(),
    ) {
        let am = AclManager::new(directory(), "admin", Some(&config)).unwrap();
        let dag = am.derive(Some("owner"), Some(&dag_config)).unwrap();

        runtime().block_on(async {
            if dag.check_am_modify_access(&user).await {
                assert!(dag.check_dag_modify_access(&user).await);
            }
            if dag.check_am_view_access(&user).await {
                assert!(dag.check_dag_view_access(&user).await);
            }
        });
    }

    #[test]
    fn prop_derive_never_changes_parent(
        config in acl_config(),
        dag_config in acl_config(),
        user in principal(),
    ) {
        let am = AclManager::new(directory(), "admin", Some(&config)).unwrap();

        let rt = runtime();
        let before: Vec<bool> = rt.block_on(async {
            let mut out = Vec::new();
            for acl_type in AclType::ALL {
                out.push(am.check_access(&user, acl_type).await);
            }
            out
        });
        let rendered_before = am.to_application_acls();
        let users_before = am.user_acls().clone();
        let groups_before = am.group_acls().clone();

        let _dag = am.derive(Some("owner"), Some(&dag_config)).unwrap();

        let after: Vec<bool> = rt.block_on(async {
            let mut out = Vec::new();
            for acl_type in AclType::ALL {
                out.push(am.check_access(&user, acl_type).await);
            }
            out
        });

        prop_assert_eq!(before, after);
        prop_assert_eq!(rendered_before, am.to_application_acls());
        prop_assert_eq!(&users_before, am.user_acls());
        prop_assert_eq!(&groups_before, am.group_acls());
    }

    #[test]
    fn prop_derive_keeps_parent_grants(
        config in acl_config(),
        dag_config in acl_config(),
        user in principal(),
    ) {
        let am = AclManager::new(directory(), "admin", Some(&config)).unwrap();
        let dag = am.derive(Some("owner"), Some(&dag_config)).unwrap();

        runtime().block_on(async {
            for acl_type in AclType::ALL {
                if am.check_access(&user, acl_type).await {
                    assert!(dag.check_access(&user, acl_type).await);
                }
            }
        });
    }

    #[test]
    fn prop_user_wildcard_dominates_view(config in acl_config(), user in principal()) {
        let config = config.with_acl(AclType::AmView, "* eng,ops");
        let am = AclManager::new(directory(), "admin", Some(&config)).unwrap();

        let allowed = runtime().block_on(am.check_am_view_access(&user));
        prop_assert!(allowed);
        prop_assert_eq!(&am.to_application_acls()[&ApplicationAccessType::ViewApp], "*");
    }

    #[test]
    fn prop_rendered_value_starts_with_owner(config in acl_config()) {
        let am = AclManager::new(directory(), "admin", Some(&config)).unwrap();

        for (_, value) in am.to_application_acls() {
            prop_assert!(value == "*" || value.starts_with("admin"));
            prop_assert!(value.matches(' ').count() <= 1);
        }
    }
}
