mod client;
mod graphql;
mod provider;

pub use provider::GitHubClient;
