use crate::paths::with_repo_var;
use crate::sources::ResolvedSourceSet;
use std::path::Path;

/// One path per line, repository prefix shown as `$<repo_env>`
pub fn render_source_list(
    sources: &ResolvedSourceSet,
    repo_root: &Path,
    repo_env: &str,
) -> String {
    sources
        .iter()
        .map(|s| format!("{}\n", with_repo_var(&s.path, repo_root, repo_env)))
        .collect()
}
