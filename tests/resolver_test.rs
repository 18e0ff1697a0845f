//! Tests for CommandResolver against a real directory tree

use std::path::{Path, PathBuf};
use std::sync::Arc;

use rstest::{fixture, rstest};
use tempfile::TempDir;

use cmdtree::application::services::{CommandResolver, TreeLayout};
use cmdtree::domain::CommandPath;
use cmdtree::infrastructure::traits::RealFileSystem;

fn argv(tokens: &[&str]) -> Vec<String> {
    tokens.iter().map(|s| s.to_string()).collect()
}

fn touch(root: &Path, relative: &str) -> PathBuf {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create dirs");
    }
    std::fs::write(&path, "").expect("write module");
    path
}

/// ```text
/// default.toml
/// create.toml
/// db/default.toml
/// db/migrate.toml
/// db/migrate/default.toml   (shadowed by db/migrate.toml)
/// db/seed/default.toml
/// empty/                    (no module)
/// empty/inner.toml
/// ```
#[fixture]
fn tree() -> TempDir {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    touch(root, "default.toml");
    touch(root, "create.toml");
    touch(root, "db/default.toml");
    touch(root, "db/migrate.toml");
    touch(root, "db/migrate/default.toml");
    touch(root, "db/seed/default.toml");
    touch(root, "empty/inner.toml");
    temp
}

fn resolver() -> CommandResolver {
    CommandResolver::new(Arc::new(RealFileSystem), TreeLayout::default())
}

#[rstest]
fn given_no_tokens_when_resolving_then_root_default_module(tree: TempDir) {
    let resolution = resolver().resolve(tree.path(), "tool", &[]);

    assert_eq!(resolution.location, tree.path().join("default.toml"));
    assert_eq!(resolution.command_path, CommandPath::new("tool"));
    assert_eq!(resolution.args_start, 0);
}

#[rstest]
fn given_leaf_token_when_resolving_then_leaf_module_and_rest_is_args(tree: TempDir) {
    let args = argv(&["create", "widget", "-f"]);

    let resolution = resolver().resolve(tree.path(), "tool", &args);

    assert_eq!(resolution.location, tree.path().join("create.toml"));
    assert_eq!(resolution.command_path.to_string(), "tool create");
    assert_eq!(resolution.args(&args), &argv(&["widget", "-f"])[..]);
}

#[rstest]
fn given_leaf_and_directory_with_same_name_when_resolving_then_leaf_wins(tree: TempDir) {
    let args = argv(&["db", "migrate", "up"]);

    let resolution = resolver().resolve(tree.path(), "tool", &args);

    assert_eq!(resolution.location, tree.path().join("db/migrate.toml"));
    assert_eq!(resolution.command_path.to_string(), "tool db migrate");
    assert_eq!(resolution.args_start, 2);
}

#[rstest]
fn given_directory_token_when_resolving_then_its_default_module(tree: TempDir) {
    let args = argv(&["db", "seed"]);

    let resolution = resolver().resolve(tree.path(), "tool", &args);

    assert_eq!(resolution.location, tree.path().join("db/seed/default.toml"));
    assert_eq!(resolution.args_start, 2);
}

#[rstest]
#[case::option_token(&["db", "--force", "migrate"], "tool db", 1)]
#[case::underscore(&["db", "mi_grate"], "tool db", 1)]
#[case::trailing_hyphen(&["create-"], "tool", 0)]
#[case::unknown_name(&["db", "nope", "migrate"], "tool db", 1)]
fn given_non_matching_token_when_resolving_then_stops_there(
    tree: TempDir,
    #[case] tokens: &[&str],
    #[case] expected_path: &str,
    #[case] expected_start: usize,
) {
    let resolution = resolver().resolve(tree.path(), "tool", &argv(tokens));

    assert_eq!(resolution.command_path.to_string(), expected_path);
    assert_eq!(resolution.args_start, expected_start);
}

#[rstest]
fn given_directory_without_module_when_resolving_then_stops_before_it(tree: TempDir) {
    let args = argv(&["empty", "inner"]);

    let resolution = resolver().resolve(tree.path(), "tool", &args);

    assert_eq!(resolution.location, tree.path().join("default.toml"));
    assert_eq!(resolution.command_path, CommandPath::new("tool"));
    assert_eq!(resolution.args(&args), &args[..]);
}

#[rstest]
fn given_same_input_when_resolving_twice_then_same_resolution(tree: TempDir) {
    let args = argv(&["db", "migrate", "--step", "2"]);
    let resolver = resolver();

    let first = resolver.resolve(tree.path(), "tool", &args);
    let second = resolver.resolve(tree.path(), "tool", &args);

    assert_eq!(first, second);
}

#[test]
fn given_missing_root_when_resolving_then_root_default_location_reported() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("absent");

    let resolution = resolver().resolve(&root, "tool", &argv(&["create"]));

    assert_eq!(resolution.location, root.join("default.toml"));
    assert_eq!(resolution.args_start, 0);
}

#[test]
fn given_custom_layout_when_resolving_then_layout_names_are_used() {
    let temp = TempDir::new().unwrap();
    touch(temp.path(), "deploy/index.cmd");
    touch(temp.path(), "deploy/prod.cmd");
    let resolver = CommandResolver::new(
        Arc::new(RealFileSystem),
        TreeLayout {
            default_module: "index".into(),
            extension: "cmd".into(),
        },
    );

    let resolution = resolver.resolve(temp.path(), "ops", &argv(&["deploy", "prod"]));

    assert_eq!(resolution.location, temp.path().join("deploy/prod.cmd"));
    assert_eq!(resolution.command_path.to_string(), "ops deploy prod");
}

#[test]
fn given_extensionless_layout_when_token_names_directory_then_its_default_module() {
    let temp = TempDir::new().unwrap();
    touch(temp.path(), "index");
    touch(temp.path(), "deploy/index");
    let resolver = CommandResolver::new(
        Arc::new(RealFileSystem),
        TreeLayout {
            default_module: "index".into(),
            extension: String::new(),
        },
    );

    let resolution = resolver.resolve(temp.path(), "ops", &argv(&["deploy"]));

    assert_eq!(resolution.location, temp.path().join("deploy/index"));
    assert_eq!(resolution.command_path.to_string(), "ops deploy");
}

#[test]
fn given_directory_named_like_leaf_module_when_resolving_then_directory_is_skipped() {
    let temp = TempDir::new().unwrap();
    std::fs::create_dir_all(temp.path().join("create.toml")).expect("create dir");
    touch(temp.path(), "create/default.toml");

    let resolution = resolver().resolve(temp.path(), "tool", &argv(&["create"]));

    assert_eq!(resolution.location, temp.path().join("create/default.toml"));
    assert_eq!(resolution.args_start, 1);
}
