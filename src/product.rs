//! Configuration product generator
//!
//! Expands a compiled domain map into the full Cartesian product of
//! concrete configurations. Scalar-like domains (unset, scalar, interval)
//! copy into every configuration unchanged; candidate lists multiply the
//! running set. Domains are visited in `ParamName` order, so the output
//! ordering is deterministic across runs.

use crate::range::{Domain, DomainMap, ParamName};
use serde::Serialize;
use std::collections::BTreeMap;

/// One concrete value inside a configuration. Never a sequence: the
/// product has already chosen a single candidate per axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Binding {
    Unset,
    Scalar(u64),
    Interval(u64, u64),
}

/// One point of the Cartesian product: every recognized name bound to
/// exactly one concrete value.
pub type Bindings = BTreeMap<ParamName, Binding>;

/// Expand the domain map into all concrete configurations.
pub fn expand(domains: &DomainMap) -> Vec<Bindings> {
    let mut configs: Vec<Bindings> = vec![Bindings::new()];
    for (&name, domain) in domains {
        match domain {
            Domain::Unset => {
                for config in &mut configs {
                    config.insert(name, Binding::Unset);
                }
            }
            Domain::Scalar(value) => {
                for config in &mut configs {
                    config.insert(name, Binding::Scalar(*value));
                }
            }
            Domain::Interval(low, high) => {
                for config in &mut configs {
                    config.insert(name, Binding::Interval(*low, *high));
                }
            }
            Domain::Candidates(values) => {
                let mut next = Vec::with_capacity(configs.len() * values.len());
                for &value in values {
                    for config in &configs {
                        let mut config = config.clone();
                        config.insert(name, Binding::Scalar(value));
                        next.push(config);
                    }
                }
                configs = next;
            }
        }
    }

    tracing::debug!("expanded {} configurations", configs.len());
    configs
}
