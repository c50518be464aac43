//! Property tests for the locator's invariants.

mod common;

use common::CountingProbe;
use proptest::prelude::*;
use shortws_common::{
    ExecutionNode, JobIdentity, PathDecision, PathLimit, PlatformKind, RemotePath, ShorteningConfig,
    StaticNode, UnchangedReason, WorkspaceLocator, default_workspace, transform_name,
};
use std::sync::Arc;

fn config_strategy() -> impl Strategy<Value = ShorteningConfig> {
    (
        0u32..1024,
        prop::option::of("[a-z_]{0,6}"),
        any::<bool>(),
        prop::option::of("[a-z_]{0,40}"),
        prop::option::of("[~+-]{0,4}"),
    )
        .prop_map(|(budget, strip, blanks, prefix, replacement)| ShorteningConfig {
            build_path_length: budget,
            strip_text: strip,
            remove_blanks: blanks,
            initial_prefix: prefix,
            ellipsis_replacement: replacement,
            ..ShorteningConfig::default()
        })
}

fn root_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "/[a-z]{1,12}(/[a-z0-9_-]{1,12}){0,4}",
        "[C-F]:\\\\[a-z]{1,12}(\\\\[a-z0-9_-]{1,12}){0,3}",
    ]
}

fn job_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_ .-]{1,30}(/[a-zA-Z0-9_ .-]{1,30}){0,4}"
}

fn locator(
    config: ShorteningConfig,
    node: &StaticNode,
    limit: u32,
) -> WorkspaceLocator<Arc<CountingProbe>> {
    let probe = Arc::new(CountingProbe::new(PlatformKind::Other));
    let locator = WorkspaceLocator::new(config, probe);
    locator.cache().put(node.identity(), PathLimit(limit));
    locator
}

proptest! {
    #[test]
    fn shortened_path_is_strictly_shorter(
        config in config_strategy(),
        root in root_strategy(),
        full_name in job_strategy(),
        limit in 0u32..5000,
    ) {
        let node = StaticNode::agent("agent", 1, root.as_str());
        let job = JobIdentity::from_full_name(full_name);
        let locator = locator(config, &node, limit);

        if let Some(path) = locator.locate(&job, &node) {
            let default = default_workspace(&RemotePath::new(root), &job);
            prop_assert!(path.char_len() < default.char_len());
        }
    }

    #[test]
    fn ample_headroom_never_shortens(
        config in config_strategy(),
        root in root_strategy(),
        full_name in job_strategy(),
        extra in 1u32..2000,
    ) {
        let node = StaticNode::agent("agent", 1, root.as_str());
        let job = JobIdentity::from_full_name(full_name);
        let default_len = default_workspace(&RemotePath::new(root), &job).char_len() as u32;
        let limit = default_len + config.build_path_length + extra;
        let locator = locator(config, &node, limit);

        prop_assert_eq!(
            locator.decide(&job, &node),
            PathDecision::Unchanged { reason: UnchangedReason::HeadroomSufficient }
        );
    }

    #[test]
    fn decide_is_idempotent(
        config in config_strategy(),
        root in root_strategy(),
        full_name in job_strategy(),
        limit in 0u32..600,
    ) {
        let node = StaticNode::agent("agent", 1, root.as_str());
        let job = JobIdentity::from_full_name(full_name);
        let locator = locator(config, &node, limit);

        let first = locator.decide(&job, &node);
        prop_assert_eq!(locator.decide(&job, &node), first);
    }

    #[test]
    fn default_transform_fits_sixteen_characters(name in "\\PC{0,60}") {
        let short = transform_name(&name, &ShorteningConfig::default());
        prop_assert!(short.chars().count() <= 16);
        prop_assert!(!short.contains("..."));
    }
}
