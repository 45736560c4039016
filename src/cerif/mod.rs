//! Client for the CERIF view of the GtR API.
//!
//! CERIF resources live under `{root}/cerif/` and are mostly consumed as
//! JSON records. Class definitions are loaded once per client and shared
//! by every clone.

mod resources;

use std::collections::HashMap;
use std::env;
use std::fmt;
use std::sync::Arc;

use tokio::sync::OnceCell;

use crate::client::{ClientOptions, GtrClient, DEFAULT_API_URL};
use crate::decoder::{DecoderFactory, Field, Relation, ResourceDecoder, ResourceKind};
use crate::error::Result;
use crate::format::{Body, Serialisation};
use crate::paging::PaginationParams;

pub use resources::{CerifClass, CerifProject, CerifRelation};

/// CERIF resource collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CerifEndpoint {
    Project,
    OrgUnit,
    Person,
    ClassScheme,
    Class,
    Fund,
    Measurement,
    PostalAddress,
    Patent,
    Product,
    Publication,
}

impl CerifEndpoint {
    /// Path segment under `{root}/cerif/`.
    pub fn path(self) -> &'static str {
        match self {
            Self::Project => "cfproj",
            Self::OrgUnit => "cforgunit",
            Self::Person => "cfpers",
            Self::ClassScheme => "cfclassscheme",
            Self::Class => "cfclass",
            Self::Fund => "cffund",
            Self::Measurement => "cfmeas",
            Self::PostalAddress => "cfpaddr",
            Self::Patent => "cfrespat",
            Self::Product => "cfresprod",
            Self::Publication => "cfrespubl",
        }
    }
}

impl fmt::Display for CerifEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Class records keyed by class id.
type ClassCache = HashMap<String, Body>;

/// CERIF API client.
///
/// Cheaply cloneable. Clones share the connection pool and the class
/// cache, which is filled on the first class lookup and never refreshed.
#[derive(Clone)]
pub struct CerifClient {
    client: GtrClient,
    class_cache: Arc<OnceCell<ClassCache>>,
}

impl fmt::Debug for CerifClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CerifClient")
            .field("base_url", &self.client.base_url())
            .field("serialisation", &self.client.serialisation())
            .field("classes_loaded", &self.class_cache.initialized())
            .finish()
    }
}

impl CerifClient {
    /// Create a client from environment variables.
    ///
    /// Same variables as [`GtrClient::from_env`], except that the
    /// serialisation defaults to JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn from_env() -> Result<Self> {
        let base_url = env::var("GTR_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let mut options = ClientOptions::from_env()?;
        if env::var("GTR_SERIALISATION").is_err() {
            options.serialisation = Serialisation::Json;
        }
        Self::new(&base_url, options)
    }

    /// Create a client for the CERIF API under `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid.
    pub fn new(base_url: &str, options: ClientOptions) -> Result<Self> {
        Ok(Self {
            client: GtrClient::with_factory(base_url, options, DecoderFactory::cerif())?,
            class_cache: Arc::new(OnceCell::new()),
        })
    }

    /// The underlying HTTP client.
    pub fn client(&self) -> &GtrClient {
        &self.client
    }

    /// URL of a CERIF collection, or of one resource in it.
    pub fn url_for(&self, endpoint: CerifEndpoint, id: Option<&str>) -> String {
        let base = format!("{}/cerif/{}", self.client.base_url(), endpoint.path());
        match id {
            Some(id) => format!("{base}/{}", urlencoding::encode(id)),
            None => base,
        }
    }

    /// Fetch a CERIF project by uuid.
    pub async fn project(&self, uuid: &str) -> Result<CerifProject> {
        let url = self.url_for(CerifEndpoint::Project, Some(uuid));
        let body = self.get_body(&url).await?;
        CerifProject::build(self, Some(url), body)
    }

    /// Look up a class by uuid.
    ///
    /// The first call loads the full class list; every later call is
    /// answered from memory. An unknown uuid gives `Ok(None)`.
    pub async fn cerif_class(&self, uuid: &str) -> Result<Option<CerifClass>> {
        let classes = self
            .class_cache
            .get_or_try_init(|| self.load_classes())
            .await?;

        classes
            .get(uuid)
            .cloned()
            .map(|body| CerifClass::build(self, body))
            .transpose()
    }

    /// Fetch any CERIF resource without decoding it into a facade.
    pub async fn raw(&self, endpoint: CerifEndpoint, id: Option<&str>) -> Result<Body> {
        self.get_body(&self.url_for(endpoint, id)).await
    }

    pub(crate) fn decoder(
        &self,
        kind: ResourceKind,
        body: Body,
    ) -> Result<Box<dyn ResourceDecoder>> {
        self.client.decoder(kind, body)
    }

    async fn get_body(&self, url: &str) -> Result<Body> {
        let fetched = self.client.fetch(url, PaginationParams::default()).await?;
        Ok(fetched.body)
    }

    async fn load_classes(&self) -> Result<ClassCache> {
        let url = self.url_for(CerifEndpoint::Class, None);
        let list = self.decoder(ResourceKind::CerifClasses, self.get_body(&url).await?)?;

        let mut classes = HashMap::new();
        for body in list.subresources(Relation::Items) {
            let class = self.decoder(ResourceKind::CerifClass, body.clone())?;
            match class.field(Field::Id) {
                Some(id) => {
                    classes.insert(id, body);
                }
                None => tracing::debug!("skipping CERIF class without an id"),
            }
        }

        tracing::debug!(count = classes.len(), "loaded CERIF classes");
        Ok(classes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> CerifClient {
        CerifClient::new(
            "https://gtr.example.org/api/",
            ClientOptions::default().with_serialisation(Serialisation::Json),
        )
        .unwrap()
    }

    #[test]
    fn test_url_for() {
        let cerif = client();
        assert_eq!(
            cerif.url_for(CerifEndpoint::Class, None),
            "https://gtr.example.org/api/cerif/cfclass"
        );
        assert_eq!(
            cerif.url_for(CerifEndpoint::Project, Some("a b")),
            "https://gtr.example.org/api/cerif/cfproj/a%20b"
        );
        assert_eq!(
            cerif.url_for(CerifEndpoint::Publication, Some("p1")),
            "https://gtr.example.org/api/cerif/cfrespubl/p1"
        );
    }

    #[test]
    fn test_clones_share_class_cache() {
        let cerif = client();
        let clone = cerif.clone();
        assert!(Arc::ptr_eq(&cerif.class_cache, &clone.class_cache));
    }

    #[test]
    fn test_factory_is_cerif() {
        let cerif = client();
        let factory = cerif.client().factory();
        assert!(factory.supports(Serialisation::Json, ResourceKind::CerifRelation));
        assert!(!factory.supports(Serialisation::Json, ResourceKind::Project));
    }
}
