//! GtR API client.
//!
//! Low-level HTTP client that handles content negotiation, authentication
//! and paging headers. Resource-specific operations are implemented via the
//! `Get` and `List` traits and the facade types.

use std::env;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use reqwest::header::ACCEPT;
use reqwest::{Client, StatusCode};
use url::Url;

use crate::decoder::{DecoderFactory, ResourceDecoder, ResourceKind};
use crate::error::{GtrError, Result};
use crate::format::{self, Body, Serialisation};
use crate::paging::{Paging, PaginationParams};
use crate::resources::{Organisation, Organisations, People, Person, Project, Projects};
use crate::resources::{Publication, Publications};
use crate::traits::{Get, List};

/// Default API root.
pub const DEFAULT_API_URL: &str = "https://gtr.ukri.org/gtr/api";
const USER_AGENT: &str = concat!("gtrclient/", env!("CARGO_PKG_VERSION"));
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

/// Basic-auth credentials.
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Serialisation to negotiate with the server.
    pub serialisation: Serialisation,
    /// Page size used by list requests that do not specify one.
    ///
    /// `None` leaves the choice to the server.
    pub page_size: Option<u32>,
    /// Optional basic-auth credentials.
    pub credentials: Option<Credentials>,
    /// Request timeout.
    pub timeout: Duration,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            serialisation: Serialisation::Xml,
            page_size: None,
            credentials: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ClientOptions {
    /// Read options from environment variables.
    ///
    /// Uses `GTR_SERIALISATION` (`xml` or `json`, anything else means xml),
    /// `GTR_PAGE_SIZE`, and `GTR_USERNAME` / `GTR_PASSWORD`.
    ///
    /// # Errors
    ///
    /// Returns an error if `GTR_PAGE_SIZE` is not a number or only one of
    /// the credentials is set.
    pub fn from_env() -> Result<Self> {
        let mut options = Self::default();

        if let Ok(name) = env::var("GTR_SERIALISATION") {
            options.serialisation = Serialisation::from_name(&name);
        }

        if let Ok(size) = env::var("GTR_PAGE_SIZE") {
            let size = size.trim().parse().map_err(|_| {
                GtrError::Config(format!("GTR_PAGE_SIZE must be a number, got '{size}'"))
            })?;
            options.page_size = Some(size);
        }

        options.credentials = match (env::var("GTR_USERNAME"), env::var("GTR_PASSWORD")) {
            (Ok(username), Ok(password)) => Some(Credentials::new(username, password)),
            (Err(_), Err(_)) => None,
            _ => {
                return Err(GtrError::Config(
                    "GTR_USERNAME and GTR_PASSWORD must be set together".to_string(),
                ))
            }
        };

        Ok(options)
    }

    /// Use the given serialisation.
    #[must_use]
    pub fn with_serialisation(mut self, serialisation: Serialisation) -> Self {
        self.serialisation = serialisation;
        self
    }

    /// Use the given default page size.
    #[must_use]
    pub fn with_page_size(mut self, page_size: Option<u32>) -> Self {
        self.page_size = page_size;
        self
    }

    /// Authenticate with basic-auth credentials.
    #[must_use]
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }
}

/// A decoded response and the paging state it carried.
#[derive(Debug)]
pub(crate) struct Fetched {
    pub(crate) body: Body,
    pub(crate) paging: Option<Paging>,
}

/// Low-level GtR API client.
///
/// Fixed to one serialisation for its lifetime. This struct is cheaply
/// cloneable; clones share the underlying connection pool and decoder
/// factory, and every facade holds one.
///
/// # Example
///
/// ```no_run
/// use gtrclient::{ClientOptions, GtrClient, Serialisation};
///
/// # async fn example() -> gtrclient::Result<()> {
/// // Create from environment variables
/// let client = GtrClient::from_env()?;
///
/// // Or configure manually
/// let client = GtrClient::new(
///     "https://gtr.ukri.org/gtr/api",
///     ClientOptions::default().with_serialisation(Serialisation::Json),
/// )?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct GtrClient {
    http: Client,
    base_url: Arc<str>,
    serialisation: Serialisation,
    page_size: Option<u32>,
    credentials: Option<Arc<Credentials>>,
    factory: Arc<DecoderFactory>,
}

impl fmt::Debug for GtrClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GtrClient")
            .field("base_url", &self.base_url)
            .field("serialisation", &self.serialisation)
            .finish_non_exhaustive()
    }
}

impl GtrClient {
    /// Create a client from environment variables.
    ///
    /// Uses `GTR_API_URL` for the API root (defaults to
    /// `https://gtr.ukri.org/gtr/api`) and [`ClientOptions::from_env`] for
    /// everything else.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn from_env() -> Result<Self> {
        let base_url = env::var("GTR_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        Self::new(&base_url, ClientOptions::from_env()?)
    }

    /// Create a new client for the native API.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid.
    pub fn new(base_url: &str, options: ClientOptions) -> Result<Self> {
        Self::with_factory(base_url, options, DecoderFactory::native())
    }

    pub(crate) fn with_factory(
        base_url: &str,
        options: ClientOptions,
        factory: DecoderFactory,
    ) -> Result<Self> {
        // Validate, then keep the root without a trailing slash
        Url::parse(base_url)?;
        let base_url = base_url.trim_end_matches('/');

        let http = Client::builder()
            .user_agent(USER_AGENT)
            .brotli(true)
            .gzip(true)
            .deflate(true)
            .timeout(options.timeout)
            .build()
            .map_err(GtrError::HttpError)?;

        Ok(Self {
            http,
            base_url: Arc::from(base_url),
            serialisation: options.serialisation,
            page_size: options.page_size,
            credentials: options.credentials.map(Arc::new),
            factory: Arc::new(factory),
        })
    }

    /// The API root, without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The negotiated serialisation.
    pub fn serialisation(&self) -> Serialisation {
        self.serialisation
    }

    /// The default page size for list requests.
    pub fn page_size(&self) -> Option<u32> {
        self.page_size
    }

    /// The decoder factory this client builds facades with.
    pub fn factory(&self) -> &DecoderFactory {
        &self.factory
    }

    // List retrieval

    /// Fetch a page of projects.
    pub async fn projects(&self, page: Option<u32>, page_size: Option<u32>) -> Result<Projects> {
        Project::list(self, self.pagination(page, page_size)).await
    }

    /// Fetch a page of organisations.
    pub async fn organisations(
        &self,
        page: Option<u32>,
        page_size: Option<u32>,
    ) -> Result<Organisations> {
        Organisation::list(self, self.pagination(page, page_size)).await
    }

    /// Fetch a page of people.
    pub async fn people(&self, page: Option<u32>, page_size: Option<u32>) -> Result<People> {
        Person::list(self, self.pagination(page, page_size)).await
    }

    /// Fetch a page of publications.
    pub async fn publications(
        &self,
        page: Option<u32>,
        page_size: Option<u32>,
    ) -> Result<Publications> {
        Publication::list(self, self.pagination(page, page_size)).await
    }

    // Individual retrieval

    /// Fetch a project by id.
    pub async fn project(&self, id: &str) -> Result<Project> {
        Project::get(self, id.to_string()).await
    }

    /// Fetch an organisation by id.
    pub async fn organisation(&self, id: &str) -> Result<Organisation> {
        Organisation::get(self, id.to_string()).await
    }

    /// Fetch a person by id.
    pub async fn person(&self, id: &str) -> Result<Person> {
        Person::get(self, id.to_string()).await
    }

    /// Fetch a publication by id.
    pub async fn publication(&self, id: &str) -> Result<Publication> {
        Publication::get(self, id.to_string()).await
    }

    fn pagination(&self, page: Option<u32>, page_size: Option<u32>) -> PaginationParams {
        PaginationParams::new(page, page_size.or(self.page_size))
    }

    /// URL of a list resource, e.g. `{root}/project/`.
    pub(crate) fn list_url(&self, path: &str) -> String {
        format!("{}/{path}/", self.base_url)
    }

    /// URL of a single resource, e.g. `{root}/project/{id}`.
    pub(crate) fn item_url(&self, path: &str, id: &str) -> String {
        format!("{}/{path}/{}", self.base_url, urlencoding::encode(id))
    }

    /// Build the decoder for a body of the given kind.
    pub(crate) fn decoder(
        &self,
        kind: ResourceKind,
        body: Body,
    ) -> Result<Box<dyn ResourceDecoder>> {
        self.factory
            .decoder(self.serialisation, kind, body)
            .ok_or(GtrError::Unsupported {
                format: self.serialisation,
                kind,
            })
    }

    /// GET a resource, decode its body and extract its paging headers.
    ///
    /// `params` replace any `page` / `fetchSize` already in the URL.
    #[tracing::instrument(skip(self))]
    pub(crate) async fn fetch(&self, url: &str, params: PaginationParams) -> Result<Fetched> {
        let mut url = Url::parse(url)?;
        params.apply(&mut url);

        let mut request = self
            .http
            .get(url.clone())
            .header(ACCEPT, self.serialisation.mime_type());
        if let Some(credentials) = &self.credentials {
            request = request.basic_auth(&credentials.username, Some(&credentials.password));
        }

        let response = request.send().await.map_err(GtrError::HttpError)?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(GtrError::FetchFailed {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let paging = Paging::from_headers(response.headers());
        let text = response.text().await.map_err(GtrError::HttpError)?;
        let body = format::decode(self.serialisation, &text)?;

        tracing::debug!(%url, paged = paging.is_some(), "fetched resource");
        Ok(Fetched { body, paging })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_debug() {
        let options = ClientOptions::default().with_credentials(Credentials::new("me", "s3cret"));
        let client = GtrClient::new("https://gtr.example.org/api", options).unwrap();
        let debug = format!("{:?}", client);
        assert!(debug.contains("GtrClient"));
        assert!(debug.contains("base_url"));
        // Password should not be in debug output
        assert!(!debug.contains("s3cret"));
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let client1 = GtrClient::new("https://gtr.example.org/api", Default::default()).unwrap();
        let client2 = GtrClient::new("https://gtr.example.org/api/", Default::default()).unwrap();
        assert_eq!(client1.base_url(), client2.base_url());
        assert_eq!(
            client1.item_url("project", "abc"),
            "https://gtr.example.org/api/project/abc"
        );
        assert_eq!(client1.list_url("person"), "https://gtr.example.org/api/person/");
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(GtrClient::new("not a url", Default::default()).is_err());
    }

    #[test]
    fn test_default_page_size_is_clamped() {
        let client = GtrClient::new(
            "https://gtr.example.org/api",
            ClientOptions::default().with_page_size(Some(10)),
        )
        .unwrap();
        assert_eq!(client.pagination(None, None).fetch_size, Some(25));
        assert_eq!(client.pagination(Some(2), Some(500)).fetch_size, Some(100));

        let client = GtrClient::new("https://gtr.example.org/api", Default::default()).unwrap();
        assert_eq!(client.pagination(None, None).fetch_size, None);
    }
}
