//! HTTP client for the AppDynamics controller REST API.

use std::fmt::Display;
use std::sync::OnceLock;
use std::time::Duration;

use chrono::{DateTime, Local};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use secrecy::SecretString;
use serde_json::Value;
use url::Url;

use crate::config::{ClientConfig, DEFAULT_TIMEOUT};
use crate::error::{DecodeError, Error, HttpError};
use crate::helpers::{normalize_base_url, BasicAuth};
use crate::model::{
    validate_enum, Account, Applications, BusinessTransactions, ConfigVariables, Domain, EventType,
    Events, FromWire, HourlyLicenseUsages, LicenseModules, LicenseUsages, MetricData, MetricTree,
    Node, Nodes, PolicyViolations, Snapshots, Tiers,
};
use crate::params::{QueryParams, SnapshotQuery, TimeRange};
use crate::time::format_iso;

const REST_BASE: &str = "/controller/rest";
const API_BASE: &str = "/api";

/// HTTP method for [`Client::send`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Method {
    #[default]
    Get,
    Post,
}

/// A response body: parsed JSON, or raw text when JSON was not requested.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Json(Value),
    Text(String),
}

impl Body {
    /// The JSON value; a text body becomes a JSON string.
    pub fn into_json(self) -> Value {
        match self {
            Body::Json(v) => v,
            Body::Text(t) => Value::String(t),
        }
    }
}

/// AppDynamics controller client.
///
/// Credentials and the base URL can be changed at any time; the basic-auth
/// principal (`username@account`) is rebuilt on every change. The underlying
/// HTTP connection pool is created on first use and reused for later calls.
#[derive(Debug, Clone)]
pub struct Client {
    base_url: String,
    username: String,
    password: SecretString,
    account: String,
    auth: BasicAuth,
    app_id: Option<u64>,
    user_agent: String,
    timeout: Duration,
    http: OnceLock<reqwest::Client>,
}

impl Client {
    pub const CALLS_PER_MINUTE: &'static str = "Calls per Minute";
    pub const AVERAGE_RESPONSE_TIME: &'static str = "Average Response Time (ms)";
    pub const NORMAL_AVERAGE_RESPONSE_TIME: &'static str = "Normal Average Response Time (ms)";
    pub const SLOW_CALLS: &'static str = "Number of Slow Calls";
    pub const VERY_SLOW_CALLS: &'static str = "Number of Very Slow Calls";
    pub const ERRORS_PER_MINUTE: &'static str = "Errors per Minute";
    pub const EXCEPTIONS_PER_MINUTE: &'static str = "Exceptions per Minute";
    pub const STALLS: &'static str = "Stall Count";

    /// Create a client for `base_url`, authenticating as `username@account`.
    pub fn new(
        base_url: &str,
        username: &str,
        password: impl Into<SecretString>,
        account: &str,
    ) -> Self {
        let password = password.into();
        Self {
            base_url: normalize_base_url(base_url),
            username: username.to_string(),
            auth: BasicAuth::new(username, account, password.clone()),
            password,
            account: account.to_string(),
            app_id: None,
            user_agent: format!("appd-rs/{}", crate::VERSION),
            timeout: DEFAULT_TIMEOUT,
            http: OnceLock::new(),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        let mut client = Self::new(
            &config.base_url,
            &config.username,
            config.password.clone(),
            &config.account,
        );
        client.app_id = config.app_id;
        client.timeout = config.timeout;
        client
    }

    /// Default application used when a call gets no explicit id.
    pub fn with_app_id(mut self, app_id: u64) -> Self {
        self.app_id = Some(app_id);
        self
    }

    /// Replace every connection parameter at once.
    pub fn configure(
        &mut self,
        base_url: &str,
        username: &str,
        password: impl Into<SecretString>,
        account: &str,
        app_id: Option<u64>,
    ) {
        self.base_url = normalize_base_url(base_url);
        self.username = username.to_string();
        self.password = password.into();
        self.account = account.to_string();
        self.app_id = app_id;
        self.refresh_auth();
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn set_base_url(&mut self, base_url: &str) {
        self.base_url = normalize_base_url(base_url);
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn set_username(&mut self, username: &str) {
        self.username = username.to_string();
        self.refresh_auth();
    }

    pub fn set_password(&mut self, password: impl Into<SecretString>) {
        self.password = password.into();
        self.refresh_auth();
    }

    pub fn account(&self) -> &str {
        &self.account
    }

    pub fn set_account(&mut self, account: &str) {
        self.account = account.to_string();
        self.refresh_auth();
    }

    pub fn auth(&self) -> &BasicAuth {
        &self.auth
    }

    pub fn app_id(&self) -> Option<u64> {
        self.app_id
    }

    pub fn set_app_id(&mut self, app_id: Option<u64>) {
        self.app_id = app_id;
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Takes effect on the next request; the pooled connection is dropped.
    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
        self.http = OnceLock::new();
    }

    fn refresh_auth(&mut self) {
        self.auth = BasicAuth::new(&self.username, &self.account, self.password.clone());
    }

    fn http(&self) -> Result<&reqwest::Client, Error> {
        if let Some(http) = self.http.get() {
            return Ok(http);
        }
        let http = reqwest::Client::builder().timeout(self.timeout).build()?;
        Ok(self.http.get_or_init(|| http))
    }

    fn headers(&self, expect_json: bool) -> Result<HeaderMap, Error> {
        let invalid = |what: &str| Error::Configuration(format!("{} is not a valid header value", what));
        let mut headers = HeaderMap::new();
        let mut auth =
            HeaderValue::from_str(&self.auth.header_value()).map_err(|_| invalid("credentials"))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&self.user_agent).map_err(|_| invalid("user agent"))?,
        );
        if expect_json {
            headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        }
        Ok(headers)
    }

    /// Issue one request against the controller.
    ///
    /// `path` is relative to the base URL. Absent parameters are dropped and
    /// `output=JSON` is added when `expect_json` is set. A non-2xx status
    /// fails with [`HttpError`].
    pub async fn send(
        &self,
        path: &str,
        mut params: QueryParams,
        method: Method,
        expect_json: bool,
    ) -> Result<Body, Error> {
        let path = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{}", path)
        };
        if expect_json {
            params.insert("output", "JSON");
        }
        let mut url = Url::parse(&format!("{}{}", self.base_url, path))?;
        let query = params.to_query_string();
        if !query.is_empty() {
            url.set_query(Some(&query));
        }

        tracing::debug!(?method, %url, principal = self.auth.principal(), "controller request");

        let http = self.http()?;
        let req = match method {
            Method::Get => http.get(url.clone()),
            Method::Post => http.post(url.clone()),
        };
        let res = req.headers(self.headers(expect_json)?).send().await?;
        let status = res.status();
        let body = res.text().await?;
        if !status.is_success() {
            tracing::warn!(%url, status = status.as_u16(), "controller request failed");
            let body = Some(body).filter(|b| !b.is_empty());
            return Err(HttpError::new(status.as_u16(), url.as_str(), body).into());
        }
        if expect_json {
            let json: Value = serde_json::from_str(&body).map_err(DecodeError::from)?;
            Ok(Body::Json(json))
        } else {
            Ok(Body::Text(body))
        }
    }

    async fn get_json(&self, path: &str, params: QueryParams) -> Result<Value, Error> {
        Ok(self.send(path, params, Method::Get, true).await?.into_json())
    }

    async fn fetch<T: FromWire>(&self, path: &str, params: QueryParams) -> Result<T, Error> {
        let json = self.get_json(path, params).await?;
        T::from_wire("response", &json)
    }

    fn app_path(&self, app_id: Option<u64>, suffix: &str) -> Result<String, Error> {
        let id = app_id
            .or(self.app_id)
            .filter(|id| *id != 0)
            .ok_or_else(|| Error::Configuration("application id is required".to_string()))?;
        Ok(format!("{}/applications/{}{}", REST_BASE, id, suffix))
    }

    /// Controller configuration variables.
    pub async fn get_config(&self) -> Result<ConfigVariables, Error> {
        self.fetch(&format!("{}/configuration", REST_BASE), QueryParams::new())
            .await
    }

    /// All business applications visible to the user.
    pub async fn list_applications(&self) -> Result<Applications, Error> {
        self.fetch(&format!("{}/applications", REST_BASE), QueryParams::new())
            .await
    }

    /// Registered business transactions; `excluded` lists the excluded ones instead.
    pub async fn list_business_transactions(
        &self,
        app_id: Option<u64>,
        excluded: bool,
    ) -> Result<BusinessTransactions, Error> {
        let mut params = QueryParams::new();
        params.insert("exclude", excluded);
        self.fetch(&self.app_path(app_id, "/business-transactions")?, params)
            .await
    }

    pub async fn list_tiers(&self, app_id: Option<u64>) -> Result<Tiers, Error> {
        self.fetch(&self.app_path(app_id, "/tiers")?, QueryParams::new())
            .await
    }

    /// Nodes of the application, or of one tier when `tier_id` is given.
    pub async fn list_nodes(
        &self,
        app_id: Option<u64>,
        tier_id: Option<u64>,
    ) -> Result<Nodes, Error> {
        let suffix = match tier_id.filter(|id| *id != 0) {
            Some(tier) => format!("/tiers/{}/nodes", tier),
            None => "/nodes".to_string(),
        };
        self.fetch(&self.app_path(app_id, &suffix)?, QueryParams::new())
            .await
    }

    /// A single node by id or name.
    pub async fn get_node(&self, node: impl Display, app_id: Option<u64>) -> Result<Node, Error> {
        let key = node.to_string();
        let path = self.app_path(app_id, &format!("/nodes/{}", key))?;
        let json = self.get_json(&path, QueryParams::new()).await?;
        // The controller wraps the node in a one-element array.
        if json.is_object() {
            return Node::from_wire("node", &json);
        }
        Nodes::from_json(&json)?
            .into_iter()
            .next()
            .ok_or_else(|| Error::not_found(key))
    }

    /// Metric data for `metric_path` (wildcards allowed).
    ///
    /// Without a range the last 15 minutes are used. With `rollup` the
    /// controller returns one aggregated point per series.
    pub async fn get_metrics(
        &self,
        metric_path: &str,
        app_id: Option<u64>,
        range: Option<&TimeRange>,
        rollup: bool,
    ) -> Result<MetricData, Error> {
        let path = self.app_path(app_id, "/metric-data")?;
        let mut params = range.cloned().unwrap_or_default().to_params()?;
        params.insert("metric-path", metric_path);
        params.insert("rollup", rollup);
        self.fetch(&path, params).await
    }

    /// Request snapshots matching `query`.
    ///
    /// Without a range no time parameters are sent and the controller applies its own default.
    pub async fn find_snapshots(
        &self,
        app_id: Option<u64>,
        range: Option<&TimeRange>,
        query: &SnapshotQuery,
    ) -> Result<Snapshots, Error> {
        let path = self.app_path(app_id, "/request-snapshots")?;
        let mut params = match range {
            Some(r) => r.to_params()?,
            None => QueryParams::new(),
        };
        params.extend(query.to_params()?);
        self.fetch(&path, params).await
    }

    /// Policy violations in the range (default: last 15 minutes).
    ///
    /// Controllers from 3.7 on report health rule violations instead; see
    /// [`list_healthrule_violations`](Self::list_healthrule_violations).
    pub async fn list_policy_violations(
        &self,
        app_id: Option<u64>,
        range: Option<&TimeRange>,
    ) -> Result<PolicyViolations, Error> {
        self.violations(app_id, "/problems/policy-violations", range)
            .await
    }

    /// Health rule violations in the range (default: last 15 minutes).
    pub async fn list_healthrule_violations(
        &self,
        app_id: Option<u64>,
        range: Option<&TimeRange>,
    ) -> Result<PolicyViolations, Error> {
        self.violations(app_id, "/problems/healthrule-violations", range)
            .await
    }

    async fn violations(
        &self,
        app_id: Option<u64>,
        suffix: &str,
        range: Option<&TimeRange>,
    ) -> Result<PolicyViolations, Error> {
        let path = self.app_path(app_id, suffix)?;
        let params = range.cloned().unwrap_or_default().to_params()?;
        self.fetch(&path, params).await
    }

    /// Events of the given types and severities in the range (default: last 15 minutes).
    pub async fn list_events(
        &self,
        app_id: Option<u64>,
        range: Option<&TimeRange>,
        event_types: &[&str],
        severities: &[&str],
    ) -> Result<Events, Error> {
        for t in event_types {
            validate_enum(EventType::ATTRIBUTE, Some(*t), EventType::ALLOWED)?;
        }
        let path = self.app_path(app_id, "/events")?;
        let mut params = range.cloned().unwrap_or_default().to_params()?;
        params.insert_opt(
            "event-types",
            Some(event_types.join(",")).filter(|s| !s.is_empty()),
        );
        params.insert_opt(
            "severities",
            Some(severities.join(",")).filter(|s| !s.is_empty()),
        );
        self.fetch(&path, params).await
    }

    /// Browse the metric tree, starting at `metric_path` or at the top.
    ///
    /// With `recurse` every folder is expanded depth-first until only
    /// leaves remain. The returned tree's [`level`](MetricTree::level) holds
    /// the nodes directly under the starting point.
    pub async fn get_metric_tree(
        &self,
        app_id: Option<u64>,
        metric_path: Option<&str>,
        recurse: bool,
    ) -> Result<MetricTree, Error> {
        let path = self.app_path(app_id, "/metrics")?;
        let (mut tree, anchor) = match metric_path.filter(|p| !p.is_empty()) {
            Some(p) => {
                let (tree, anchor) = MetricTree::anchored(p);
                (tree, Some(anchor))
            }
            None => (MetricTree::new(), None),
        };

        let top = self.metric_level(&path, &mut tree, anchor).await?;
        tree.set_level(top.clone());
        if !recurse {
            return Ok(tree);
        }

        let mut pending: Vec<_> = top.into_iter().rev().collect();
        while let Some(id) = pending.pop() {
            let is_folder = tree.get(id).is_some_and(|n| n.is_folder());
            if !is_folder {
                continue;
            }
            let children = self.metric_level(&path, &mut tree, Some(id)).await?;
            pending.extend(children.into_iter().rev());
        }
        Ok(tree)
    }

    async fn metric_level(
        &self,
        path: &str,
        tree: &mut MetricTree,
        parent: Option<crate::model::NodeId>,
    ) -> Result<Vec<crate::model::NodeId>, Error> {
        let mut params = QueryParams::new();
        params.insert_opt("metric-path", parent.and_then(|p| tree.path(p)));
        tracing::trace!(metric_path = ?params.get("metric-path").flatten(), "fetching metric tree level");
        let json = self.get_json(path, params).await?;
        tree.extend_from_json(&json, parent)
    }

    /// The account of the authenticated user.
    pub async fn get_my_account(&self) -> Result<Account, Error> {
        self.fetch(&format!("{}/accounts/myaccount", API_BASE), QueryParams::new())
            .await
    }

    pub async fn get_account(&self, account_id: impl Display) -> Result<Account, Error> {
        self.fetch(&format!("{}/accounts/{}", API_BASE, account_id), QueryParams::new())
            .await
    }

    pub async fn get_license_modules(
        &self,
        account_id: impl Display,
    ) -> Result<LicenseModules, Error> {
        self.fetch(
            &format!("{}/accounts/{}/licensemodules", API_BASE, account_id),
            QueryParams::new(),
        )
        .await
    }

    /// Hourly license usage, optionally for one module and time window.
    pub async fn get_license_usage(
        &self,
        account_id: impl Display,
        license_module: Option<&str>,
        start_time: Option<&DateTime<Local>>,
        end_time: Option<&DateTime<Local>>,
    ) -> Result<HourlyLicenseUsages, Error> {
        let params = license_params(license_module, false, start_time, end_time);
        self.fetch(&license_usage_path(account_id), params).await
    }

    /// License usage at five minute resolution.
    pub async fn get_license_usage_5min(
        &self,
        account_id: impl Display,
        license_module: Option<&str>,
        start_time: Option<&DateTime<Local>>,
        end_time: Option<&DateTime<Local>>,
    ) -> Result<LicenseUsages, Error> {
        let params = license_params(license_module, true, start_time, end_time);
        self.fetch(&license_usage_path(account_id), params).await
    }
}

fn license_usage_path(account_id: impl Display) -> String {
    format!("{}/accounts/{}/licensemodules/usages", API_BASE, account_id)
}

fn license_params(
    license_module: Option<&str>,
    five_minutes: bool,
    start_time: Option<&DateTime<Local>>,
    end_time: Option<&DateTime<Local>>,
) -> QueryParams {
    let mut params = QueryParams::new();
    params.insert_opt("licensemodule", license_module);
    params.insert("showfiveminutesresolution", five_minutes);
    params.insert_opt("startdate", start_time.map(format_iso));
    params.insert_opt("enddate", end_time.map(format_iso));
    params
}

impl Default for Client {
    /// A client for a local single-tenant controller with the demo credentials.
    fn default() -> Self {
        Self::from_config(&ClientConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_follows_every_credential_change() {
        let mut client = Client::default();
        assert_eq!(client.base_url(), "http://localhost:8090");
        assert_eq!(client.auth().principal(), "user1@customer1");

        client.set_username("ops");
        assert_eq!(client.auth().principal(), "ops@customer1");
        client.set_account("acme");
        assert_eq!(client.auth().principal(), "ops@acme");
        client.set_password("hunter2");
        assert_eq!(
            client.auth().header_value(),
            BasicAuth::new("ops", "acme", SecretString::from("hunter2")).header_value()
        );

        client.configure("ctrl.example.com/", "a", "b", "c", Some(3));
        assert_eq!(client.base_url(), "http://ctrl.example.com");
        assert_eq!(
            client.auth().header_value(),
            BasicAuth::new("a", "c", SecretString::from("b")).header_value()
        );
        assert_eq!(client.app_id(), Some(3));
    }

    #[test]
    fn app_path_prefers_explicit_id() {
        let client = Client::default().with_app_id(7);
        assert_eq!(
            client.app_path(None, "/tiers").unwrap(),
            "/controller/rest/applications/7/tiers"
        );
        assert_eq!(
            client.app_path(Some(9), "").unwrap(),
            "/controller/rest/applications/9"
        );
        assert!(matches!(
            Client::default().app_path(None, "/tiers"),
            Err(Error::Configuration(_))
        ));
        assert!(client.app_path(Some(0), "/tiers").is_err());
    }

    #[test]
    fn license_params_format_dates() {
        use chrono::TimeZone;
        let start = Local.with_ymd_and_hms(2015, 3, 1, 0, 0, 0).unwrap();
        let p = license_params(Some("java"), false, Some(&start), None);
        assert_eq!(p.get("showfiveminutesresolution"), Some(Some("false")));
        assert_eq!(p.get("startdate"), Some(Some(format_iso(&start).as_str())));
        assert_eq!(p.get("enddate"), Some(None));
    }

    #[test]
    fn debug_hides_password() {
        let mut client = Client::new("localhost:8090", "user1", "topsecret", "customer1");
        assert!(!format!("{:?}", client).contains("topsecret"));
        client.set_password(String::from("rotated"));
        assert!(!format!("{:?}", client).contains("rotated"));
        let config = ClientConfig::default();
        assert!(!format!("{:?}", config).contains("welcome"));
    }
}
