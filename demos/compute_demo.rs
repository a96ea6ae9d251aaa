//! Computes permissions for a small blog-style permission map and prints them.
//!
//! Run with: cargo run --example compute_demo

use anyhow::Result;
use colored::Colorize;
use permengine::errors::{forbidden, ErrorExtra};
use permengine::logging::{init_logging, LoggingConfig};
use permengine::permissions::Subactions;
use permengine::{
    EngineConfig, ModelSet, PermissionEngine, PermissionEntity, PermissionFn, PermissionMap,
};
use serde_json::json;

fn owner_id(models: &ModelSet, name: &str) -> Option<i64> {
    models.get(name).and_then(|m| m.get("ownerId")).and_then(|v| v.as_i64())
}

fn user_id(models: &ModelSet) -> Option<i64> {
    models.get("user").and_then(|u| u.get("id")).and_then(|v| v.as_i64())
}

fn main() -> Result<()> {
    init_logging(&LoggingConfig::default().with_filter("permengine=debug"))?;

    let owns_post = PermissionFn::new(["user", "post"], |models| {
        if user_id(models).is_some() && user_id(models) == owner_id(models, "post") {
            Ok(true)
        } else {
            Err(forbidden(
                Some("NOT_OWNER"),
                Some(ErrorExtra::remediation("request-transfer")),
            )
            .into())
        }
    });

    let map = PermissionMap::builder()
        .entity(
            "posts",
            PermissionEntity::new()
                .action("view", PermissionFn::constant(["user"], true))
                .action("delete", owns_post.clone())
                .nested(
                    "edit",
                    Subactions::new()
                        .action("body", owns_post)
                        .action("editHash", PermissionFn::constant(["user"], false)),
                ),
        )
        .build()?;

    let engine = PermissionEngine::with_config(map, EngineConfig::new().with_reasons(true));

    for (label, owner) in [("owner", 1), ("stranger", 2)] {
        let models = ModelSet::new()
            .with("user", json!({ "id": 1 }))
            .with("post", json!({ "id": 10, "ownerId": owner }));
        let permissions = engine.compute("posts", &models)?;

        println!("{}", format!("== {} ==", label).bold());
        for (key, access) in permissions.iter() {
            let verdict = if access { "allow".green() } else { "deny".red() };
            let reason = permissions
                .reason(key)
                .map(|r| format!(" ({})", r))
                .unwrap_or_default();
            println!("  {:<16} {}{}", key, verdict, reason.dimmed());
        }
        println!("{}", serde_json::to_string_pretty(&permissions)?);
    }

    if let Err(err) = engine.compute("comments", &ModelSet::new()) {
        println!("{} {}", "configuration error:".yellow(), err);
    }

    Ok(())
}
