use std::collections::BTreeMap;

/// Known exchange addresses, injected from configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExchangeDirectory {
    exchanges: BTreeMap<String, String>,
}

impl ExchangeDirectory {
    pub fn new(exchanges: BTreeMap<String, String>) -> Self {
        Self { exchanges }
    }

    pub fn get_exchange_name(
        &self,
        address: &str,
    ) -> Option<&str> {
        self.exchanges.get(address).map(String::as_str)
    }

    pub fn is_exchange(
        &self,
        address: &str,
    ) -> bool {
        self.exchanges.contains_key(address)
    }
}

impl<A: Into<String>, N: Into<String>> FromIterator<(A, N)> for ExchangeDirectory {
    fn from_iter<I: IntoIterator<Item = (A, N)>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(|(address, name)| (address.into(), name.into())).collect())
    }
}
