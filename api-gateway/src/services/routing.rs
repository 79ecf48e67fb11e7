use crate::config::ServiceRoute;

/// Prefix table. A prefix matches the path itself or anything below it, so
/// `/payments` owns `/payments/invoice/1` but not `/paymentsx`.
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<ServiceRoute>,
}

impl RouteTable {
    pub fn new(routes: Vec<ServiceRoute>) -> Self {
        Self { routes }
    }

    pub fn resolve(&self, path: &str) -> Option<&ServiceRoute> {
        self.routes.iter().find(|route| {
            path.strip_prefix(route.prefix.as_str())
                .map(|rest| rest.is_empty() || rest.starts_with('/'))
                .unwrap_or(false)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route(prefix: &str, service: &str) -> ServiceRoute {
        ServiceRoute {
            prefix: prefix.to_string(),
            service: service.to_string(),
            base_url: format!("http://{}", service),
        }
    }

    fn table() -> RouteTable {
        RouteTable::new(vec![
            route("/customers", "customer-service"),
            route("/invoices", "invoice-service"),
            route("/currency-rates", "invoice-service"),
            route("/dashboard", "analytics-service"),
        ])
    }

    #[test]
    fn resolves_by_first_segment() {
        let table = table();
        assert_eq!(
            table.resolve("/customers").unwrap().service,
            "customer-service"
        );
        assert_eq!(
            table.resolve("/invoices/abc/pdf").unwrap().service,
            "invoice-service"
        );
        assert_eq!(
            table.resolve("/currency-rates/convert").unwrap().service,
            "invoice-service"
        );
    }

    #[test]
    fn unknown_or_partial_prefix_is_unrouted() {
        let table = table();
        assert!(table.resolve("/users").is_none());
        assert!(table.resolve("/customersx").is_none());
        assert!(table.resolve("/").is_none());
    }
}
