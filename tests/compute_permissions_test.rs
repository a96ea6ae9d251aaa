// Tests for permission computation through the public API
//
// Run with: cargo test --test compute_permissions_test

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use permengine::errors::{forbidden, ErrorExtra};
    use permengine::permissions::{
        compute_permissions, Denial, ModelSet, PermissionEntity, PermissionFn, PermissionMap,
        Subactions, UNKNOWN_ERROR,
    };
    use permengine::EngineError;
    use serde_json::{json, Value};

    fn single_action_map(permission: PermissionFn) -> PermissionMap {
        PermissionMap::builder()
            .entity("users", PermissionEntity::new().action("delete", permission))
            .build()
            .unwrap()
    }

    fn user_models() -> ModelSet {
        ModelSet::new().with("user", json!({ "id": 1 }))
    }

    fn is_owner(models: &ModelSet) -> bool {
        let user = models.get("user").and_then(|u| u.get("id"));
        let owner = models.get("post").and_then(|p| p.get("ownerId"));
        user.is_some() && user == owner
    }

    #[test]
    fn test_granted_action() {
        let map = single_action_map(PermissionFn::constant(["user"], true));
        let result = compute_permissions(&map, "users", &user_models(), false).unwrap();

        assert_eq!(result.to_json(), json!({ "delete": true }));
    }

    #[test]
    fn test_structured_denial_with_reasons() {
        let map = single_action_map(PermissionFn::new(["user"], |_| {
            Err(forbidden(
                Some("NOT_OWNER"),
                Some(ErrorExtra::remediation("request-transfer")),
            )
            .into())
        }));
        let result = compute_permissions(&map, "users", &user_models(), true).unwrap();

        assert_eq!(
            result.to_json(),
            json!({
                "delete": false,
                "$reasons": { "delete": "NOT_OWNER" },
                "$remediationOptions": { "delete": "request-transfer" }
            })
        );
    }

    #[test]
    fn test_denial_without_reasons_requested() {
        let map = single_action_map(PermissionFn::new(["user"], |_| {
            Err(forbidden(Some("NOT_OWNER"), None).into())
        }));
        let result = compute_permissions(&map, "users", &user_models(), false).unwrap();

        assert_eq!(result.to_json(), json!({ "delete": false }));
        assert!(!result.has_reasons());
    }

    #[test]
    fn test_plain_boolean_has_no_reason_entry() {
        let map = single_action_map(PermissionFn::constant(["user"], false));
        let result = compute_permissions(&map, "users", &user_models(), true).unwrap();

        assert_eq!(result.get("delete"), Some(false));
        assert_eq!(result.reason("delete"), None);
        assert_eq!(result.remediation_option("delete"), None);
    }

    #[test]
    fn test_unstructured_failure_reports_unknown_error() {
        let map = single_action_map(PermissionFn::new(["user"], |_| {
            Err(Denial::Unexpected("lookup failed".to_string()))
        }));
        let result = compute_permissions(&map, "users", &user_models(), true).unwrap();

        assert_eq!(result.get("delete"), Some(false));
        assert_eq!(result.reason("delete"), Some(UNKNOWN_ERROR));
        assert_eq!(result.remediation_option("delete"), None);
    }

    #[test]
    fn test_missing_model_is_configuration_error() {
        let map = single_action_map(PermissionFn::constant(["user"], true));
        let err = compute_permissions(&map, "users", &ModelSet::new(), false).unwrap_err();

        match err {
            EngineError::ModelMismatch {
                entity,
                expected,
                given,
            } => {
                assert_eq!(entity, "users");
                assert_eq!(expected, vec!["user"]);
                assert!(given.is_empty());
            }
            other => panic!("Expected model mismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_extra_model_is_configuration_error() {
        let map = single_action_map(PermissionFn::constant(["user"], true));
        let models = user_models().with("post", json!({ "id": 9 }));
        let err = compute_permissions(&map, "users", &models, false).unwrap_err();

        assert!(err.to_string().contains("Wrong expected models for \"users\""));
    }

    #[test]
    fn test_unknown_entity_runs_no_predicate() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let map = single_action_map(PermissionFn::new(["user"], move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(true)
        }));

        let err = compute_permissions(&map, "groups", &user_models(), false).unwrap_err();
        assert_eq!(err.to_string(), "Invalid entity groups");
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_model_mismatch_runs_no_predicate() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let map = single_action_map(PermissionFn::new(["user"], move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(true)
        }));

        assert!(compute_permissions(&map, "users", &ModelSet::new(), false).is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_nested_subactions_are_flattened() {
        let map = PermissionMap::builder()
            .entity(
                "posts",
                PermissionEntity::new()
                    .action("view", PermissionFn::constant(["user"], true))
                    .nested(
                        "delete",
                        Subactions::new()
                            .action("editHash", PermissionFn::new(["user", "post"], |m| Ok(is_owner(m))))
                            .action(
                                "purge",
                                PermissionFn::new(["user"], |_| {
                                    Err(forbidden(Some("ADMIN_ONLY"), None).into())
                                }),
                            ),
                    ),
            )
            .build()
            .unwrap();

        let models = ModelSet::new()
            .with("post", json!({ "id": 5, "ownerId": 1 }))
            .with("user", json!({ "id": 1 }));
        let result = compute_permissions(&map, "posts", &models, true).unwrap();

        let keys: Vec<&str> = result.keys().collect();
        assert_eq!(keys, vec!["view", "delete.editHash", "delete.purge"]);
        assert_eq!(
            result.to_json(),
            json!({
                "view": true,
                "delete.editHash": true,
                "delete.purge": false,
                "$reasons": { "delete.purge": "ADMIN_ONLY" },
                "$remediationOptions": {}
            })
        );
    }

    #[test]
    fn test_failing_predicate_does_not_stop_siblings() {
        let map = PermissionMap::builder()
            .entity(
                "users",
                PermissionEntity::new()
                    .action("edit", PermissionFn::new(["user"], |_| panic!("broken check")))
                    .action("view", PermissionFn::constant(["user"], true)),
            )
            .build()
            .unwrap();

        let result = compute_permissions(&map, "users", &user_models(), true).unwrap();
        assert_eq!(result.get("edit"), Some(false));
        assert_eq!(result.reason("edit"), Some(UNKNOWN_ERROR));
        assert_eq!(result.get("view"), Some(true));
    }

    #[test]
    fn test_models_from_json_with_falsy_entries() {
        let map = single_action_map(PermissionFn::constant(["user"], true));
        let models =
            ModelSet::from_json(json!({ "user": { "id": 1 }, "post": null, "org": false }))
                .unwrap();

        let result = compute_permissions(&map, "users", &models, false).unwrap();
        assert_eq!(result.to_json(), json!({ "delete": true }));
    }

    #[test]
    fn test_serialized_output_is_flat_object() {
        let map = single_action_map(PermissionFn::constant(["user"], true));
        let result = compute_permissions(&map, "users", &user_models(), true).unwrap();

        let text = serde_json::to_string(&result).unwrap();
        let value: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["delete"], json!(true));
        assert_eq!(value["$reasons"], json!({}));
        assert_eq!(value["$remediationOptions"], json!({}));
    }

    #[test]
    fn test_json_output_follows_declared_order() {
        let map = PermissionMap::builder()
            .entity(
                "posts",
                PermissionEntity::new()
                    .action("zeta", PermissionFn::constant(["user"], true))
                    .subactions("edit", |sub| {
                        sub.action("body", PermissionFn::constant(["user"], false))
                    })
                    .action("alpha", PermissionFn::constant(["user"], true)),
            )
            .build()
            .unwrap();

        let result = compute_permissions(&map, "posts", &user_models(), true).unwrap();
        let value = result.to_json();
        let keys: Vec<&str> = value
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();

        assert_eq!(
            keys,
            vec!["zeta", "edit.body", "alpha", "$reasons", "$remediationOptions"]
        );
    }
}
