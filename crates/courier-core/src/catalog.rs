//! Built-in operation catalogs.
//!
//! Each catalog is a named, ordered group of operations. Configuration picks
//! which catalogs a registry is built from.

use crate::error::RegistryError;
use crate::types::{OperationSpec, ParamType};

/// Every built-in catalog, in default load order.
pub const CATALOG_NAMES: &[&str] = &["photos", "github", "mail", "social"];

/// Operations for the named catalog.
pub fn by_name(name: &str) -> Result<Vec<OperationSpec>, RegistryError> {
    match name {
        "photos" => Ok(photos()),
        "github" => Ok(github()),
        "mail" => Ok(mail()),
        "social" => Ok(social()),
        other => Err(RegistryError::UnknownCatalog(other.to_string())),
    }
}

/// Whether `name` is a built-in catalog.
pub fn is_known(name: &str) -> bool {
    CATALOG_NAMES.contains(&name)
}

pub fn photos() -> Vec<OperationSpec> {
    vec![
        OperationSpec::new("list_photos").describe("List photos in the library"),
        OperationSpec::new("search_photos")
            .describe("Search photos by tag or content")
            .required("tag", ParamType::String),
        OperationSpec::new("create_album")
            .describe("Create a new photo album")
            .optional_with_default("album_name", ParamType::String, "New Album"),
        OperationSpec::new("list_albums").describe("List photo albums"),
    ]
}

pub fn github() -> Vec<OperationSpec> {
    let owner_repo = |name: &str, description: &str| {
        OperationSpec::new(name)
            .describe(description)
            .required("owner", ParamType::String)
            .required("repo", ParamType::String)
    };

    vec![
        OperationSpec::new("create_repository")
            .describe("Create a new repository")
            .required("name", ParamType::String)
            .optional_with_default("description", ParamType::String, "")
            .optional_with_default("scope", ParamType::String, "public")
            .optional_with_default("add_readme", ParamType::Bool, false),
        owner_repo("star_repository", "Star a repository"),
        owner_repo("unstar_repository", "Remove the star from a repository"),
        OperationSpec::new("list_repositories").describe("List the user's repositories"),
        owner_repo("delete_repository", "Delete a repository"),
        owner_repo("get_repository_details", "Show details about a repository"),
        owner_repo("fork_repository", "Fork a repository"),
        owner_repo(
            "toggle_visibility",
            "Switch a repository between public and private",
        ),
    ]
}

pub fn mail() -> Vec<OperationSpec> {
    vec![OperationSpec::new("compose_email")
        .describe("Draft an email to a recipient about a topic")
        .required("recipient", ParamType::String)
        .required("topic", ParamType::String)
        .optional_with_default("recipient_name", ParamType::String, "")
        .optional_with_default("sender_name", ParamType::String, "")]
}

pub fn social() -> Vec<OperationSpec> {
    vec![OperationSpec::new("post_tweet")
        .describe("Post a tweet")
        .required("text", ParamType::String)]
}
