//! Jolokia request URL construction.
//!
//! # Responsibilities
//! - Build the servlet base URL from connection parameters
//! - Address broker, queue and topic MBeans
//!
//! # Design Decisions
//! - URLs are built as plain strings; `url::Url` percent-encodes the quotes,
//!   braces and spaces of MBean names when the request is made
//! - Credentials are not embedded; the client sends them as basic auth

use crate::broker::types::RoutingType;
use crate::config::ConnectionConfig;

/// JMX domain of the Artemis broker MBeans.
pub const MBEAN_DOMAIN: &str = "org.apache.activemq.artemis:";

/// Filter argument of `listQueues`; empty fields select every queue.
const LIST_QUEUES_FILTER: &str = r#"{"operation": "", "field": "", "value": ""}"#;

/// Page size of `listQueues`.
const LIST_QUEUES_PAGE_SIZE: u32 = 1000;

/// Builds request URLs for one broker.
#[derive(Debug, Clone)]
pub struct JolokiaUrls {
    base: String,
    broker_mbean: String,
}

impl JolokiaUrls {
    pub fn new(base: impl Into<String>, broker_name: &str) -> Self {
        let mut base = base.into();
        if !base.ends_with('/') {
            base.push('/');
        }
        Self {
            base,
            broker_mbean: format!("{}broker=\"{}\"", MBEAN_DOMAIN, broker_name),
        }
    }

    pub fn from_config(config: &ConnectionConfig) -> Self {
        let base = match &config.jolokia_url {
            Some(url) => url.clone(),
            None => format!(
                "{}://{}:{}/{}",
                if config.ssl { "https" } else { "http" },
                config.host,
                config.port,
                config.url_tail.trim_matches('/'),
            ),
        };
        Self::new(base, &config.broker_name)
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    fn query(&self, operation: &str, dest: &str) -> String {
        format!("{}{}/{}{}", self.base, operation, self.broker_mbean, dest)
    }

    fn address_mbean(name: &str, routing: RoutingType) -> String {
        format!(
            ",component=addresses,address=\"{name}\",subcomponent=queues,routing-type=\"{}\",queue=\"{name}\"",
            routing.as_str()
        )
    }

    /// `exec` of `listQueues` returning the first page of all queues.
    pub fn list_queues(&self) -> String {
        self.query(
            "exec",
            &format!(
                "/listQueues(java.lang.String,int,int)/{}/{}/{}",
                LIST_QUEUES_FILTER, 1, LIST_QUEUES_PAGE_SIZE
            ),
        )
    }

    /// `read` of a queue (anycast) or topic (multicast) MBean.
    pub fn address(&self, name: &str, routing: RoutingType) -> String {
        self.query("read", &Self::address_mbean(name, routing))
    }

    /// `exec` of `browse(1, 1)`: the oldest message of a queue.
    pub fn browse_oldest(&self, queue: &str) -> String {
        self.query(
            "exec",
            &format!(
                "{}/browse(int,int)/{}/{}",
                Self::address_mbean(queue, RoutingType::Anycast),
                1,
                1
            ),
        )
    }

    /// `read` of the broker `Started` attribute.
    pub fn started(&self) -> String {
        self.query("read", "/Started")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn urls() -> JolokiaUrls {
        JolokiaUrls::from_config(&ConnectionConfig::default())
    }

    #[test]
    fn test_base_from_connection_parameters() {
        assert_eq!(urls().base(), "http://localhost:8161/console/jolokia/");

        let mut config = ConnectionConfig::default();
        config.ssl = true;
        config.host = "mq.example.com".into();
        config.port = 8443;
        config.url_tail = "/jolokia/".into();
        assert_eq!(
            JolokiaUrls::from_config(&config).base(),
            "https://mq.example.com:8443/jolokia/"
        );
    }

    #[test]
    fn test_override_url_gets_trailing_slash() {
        let mut config = ConnectionConfig::default();
        config.jolokia_url = Some("http://user:pw@gateway:9000/j".into());
        config.host = "ignored".into();
        assert_eq!(JolokiaUrls::from_config(&config).base(), "http://user:pw@gateway:9000/j/");
    }

    #[test]
    fn test_operation_urls() {
        let urls = urls();
        assert_eq!(
            urls.started(),
            "http://localhost:8161/console/jolokia/read/org.apache.activemq.artemis:broker=\"localhost\"/Started"
        );
        assert_eq!(
            urls.list_queues(),
            "http://localhost:8161/console/jolokia/exec/org.apache.activemq.artemis:broker=\"localhost\"\
             /listQueues(java.lang.String,int,int)/{\"operation\": \"\", \"field\": \"\", \"value\": \"\"}/1/1000"
        );
        assert_eq!(
            urls.address("orders", RoutingType::Multicast),
            "http://localhost:8161/console/jolokia/read/org.apache.activemq.artemis:broker=\"localhost\"\
             ,component=addresses,address=\"orders\",subcomponent=queues,routing-type=\"multicast\",queue=\"orders\""
        );
        assert!(urls
            .browse_oldest("orders")
            .ends_with("routing-type=\"anycast\",queue=\"orders\"/browse(int,int)/1/1"));
    }
}
