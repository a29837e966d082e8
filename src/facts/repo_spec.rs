use crate::Result;
use core::fmt::{Display, Formatter};
use ohno::{IntoAppError, bail};
use url::Url;

const GITHUB_HOST: &str = "github.com";
const NPM_HOSTS: &[&str] = &["npmjs.com", "www.npmjs.com"];

/// Coordinates of a GitHub repository.
///
/// Accepts the URL shapes found in package manifests and registry listings: `git+https://...`,
/// URLs without a scheme, URLs with a trailing `.git`, and URLs pointing somewhere inside the
/// repository. Two specs are equal when they name the same repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoSpec {
    url: Url,
    owner: Box<str>,
    repo: Box<str>,
}

impl RepoSpec {
    pub fn parse(text: &str) -> Result<Self> {
        let text = text.trim();
        let text = text.strip_prefix("git+").unwrap_or(text);

        let url = if text.contains("://") {
            Url::parse(text)
        } else {
            Url::parse(&format!("https://{text}"))
        }
        .into_app_err_with(|| format!("invalid repository URL '{text}'"))?;

        let host = url.host_str().unwrap_or_default();
        if NPM_HOSTS.contains(&host) {
            bail!("registry URLs are not supported, provide the package's GitHub repository URL instead: {url}");
        }

        if host != GITHUB_HOST && host != "www.github.com" {
            bail!("not a GitHub URL: {url}");
        }

        let path_segments: Vec<_> = url.path_segments().map(Iterator::collect).unwrap_or_default();
        if path_segments.len() < 2 {
            bail!("invalid repository URL format: {url}");
        }

        let owner = path_segments[0];
        let repo = path_segments[1].trim_end_matches(".git");
        if owner.is_empty() || repo.is_empty() {
            bail!("invalid repository URL, empty owner or repo name: {url}");
        }

        let canonical = Url::parse(&format!("https://{GITHUB_HOST}/{owner}/{repo}"))
            .into_app_err_with(|| format!("invalid repository coordinates '{owner}/{repo}'"))?;

        Ok(Self {
            url: canonical,
            owner: Box::from(owner),
            repo: Box::from(repo),
        })
    }

    /// Canonical `https://github.com/{owner}/{repo}` form of the repository URL.
    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.url
    }

    #[must_use]
    pub fn owner(&self) -> &str {
        &self.owner
    }

    #[must_use]
    pub fn repo(&self) -> &str {
        &self.repo
    }
}

impl Display for RepoSpec {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.url)
    }
}
