//! Range compiler: specification strings into concrete parameter domains
//!
//! Every structural parameter arrives as a short string (`"1g-64g"`,
//! `"4k"`, `"-100"`) tagged with a kind. The compiler turns each string
//! into a finite [`Domain`]: a scalar, a bounded interval, or an ordered
//! list of candidate values that later multiplies the configuration
//! product.
//!
//! The parameter vocabulary is fixed. It lives in an immutable [`Schema`]
//! table that callers pass in explicitly, so independent runs never share
//! lookup state.

use crate::error::{CalcError, ParseIssue, Result};
use crate::suffix::from_suffix;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// How a parameter's specification string is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// A single suffixed integer.
    Plain,
    /// Comma-separated scalars and `start-end` ranges expanded by doubling.
    Pow2Range,
    /// Like [`ParamKind::Pow2Range`] but stepping by ten.
    Pow10Range,
    /// A single `(low, high)` pair; `-X` means `(0, X)`.
    Interval,
}

/// The fixed parameter vocabulary.
///
/// Ordering follows the declaration order below and determines the
/// (deterministic) expansion order of the configuration product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamName {
    MaxDataFile,
    BlockSize,
    CollisionInterval,
    MaxInitMem,
    MaxTotalMem,
    MinChainEntries,
    MinMaxBlocksPerHead,
}

impl ParamName {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParamName::MaxDataFile => "maxdatafile",
            ParamName::BlockSize => "blocksize",
            ParamName::CollisionInterval => "collisioninterval",
            ParamName::MaxInitMem => "maxinitmem",
            ParamName::MaxTotalMem => "maxtotalmem",
            ParamName::MinChainEntries => "minchainentries",
            ParamName::MinMaxBlocksPerHead => "minmaxblocksperhead",
        }
    }
}

impl fmt::Display for ParamName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ParamName {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "maxdatafile" => Ok(ParamName::MaxDataFile),
            "blocksize" => Ok(ParamName::BlockSize),
            "collisioninterval" => Ok(ParamName::CollisionInterval),
            "maxinitmem" => Ok(ParamName::MaxInitMem),
            "maxtotalmem" => Ok(ParamName::MaxTotalMem),
            "minchainentries" => Ok(ParamName::MinChainEntries),
            "minmaxblocksperhead" => Ok(ParamName::MinMaxBlocksPerHead),
            other => Err(CalcError::UnrecognizedParameter(other.to_string())),
        }
    }
}

/// Immutable table mapping each parameter to its kind.
///
/// Passed into [`compile`] rather than held as process-wide state, so
/// multiple sizing runs (and tests) stay independent.
#[derive(Debug, Clone)]
pub struct Schema {
    entries: Vec<(ParamName, ParamKind)>,
    required: Vec<ParamName>,
}

impl Schema {
    /// The head/chain block-store index vocabulary.
    pub fn block_store() -> Self {
        Schema {
            entries: vec![
                (ParamName::MaxDataFile, ParamKind::Pow2Range),
                (ParamName::BlockSize, ParamKind::Pow2Range),
                (ParamName::CollisionInterval, ParamKind::Pow10Range),
                (ParamName::MaxInitMem, ParamKind::Plain),
                (ParamName::MaxTotalMem, ParamKind::Plain),
                (ParamName::MinChainEntries, ParamKind::Pow2Range),
                (ParamName::MinMaxBlocksPerHead, ParamKind::Interval),
            ],
            required: vec![
                ParamName::MaxDataFile,
                ParamName::BlockSize,
                ParamName::CollisionInterval,
            ],
        }
    }

    pub fn kind_of(&self, name: ParamName) -> Option<ParamKind> {
        self.entries
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, k)| *k)
    }

    pub fn names(&self) -> impl Iterator<Item = ParamName> + '_ {
        self.entries.iter().map(|(n, _)| *n)
    }

    pub fn required(&self) -> &[ParamName] {
        &self.required
    }
}

impl Default for Schema {
    fn default() -> Self {
        Self::block_store()
    }
}

/// Compiled form of one parameter specification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Domain {
    /// Parameter was never supplied; downstream filters treat it as
    /// unconstrained.
    Unset,
    /// A single concrete value.
    Scalar(u64),
    /// A `(low, high)` bound pair.
    Interval(u64, u64),
    /// Ordered candidate values; one axis of the configuration product.
    Candidates(Vec<u64>),
}

/// Compiled specification set: every recognized name maps to a domain.
pub type DomainMap = BTreeMap<ParamName, Domain>;

fn parse_error(param: ParamName, value: &str) -> impl FnOnce(ParseIssue) -> CalcError + '_ {
    move |issue| CalcError::Parse {
        param,
        value: value.to_string(),
        issue,
    }
}

/// Expand comma-separated scalars and `start-end` ranges, stepping with `f`.
///
/// A range contributes `start, f(start), f(f(start)), ...` for as long as
/// the value stays within `end`; `start == end` contributes exactly one
/// value and `start > end` contributes nothing.
fn expand_range(s: &str, f: impl Fn(u64) -> u64) -> std::result::Result<Vec<u64>, ParseIssue> {
    let mut values = Vec::new();
    for token in s.split(',') {
        match token.split_once('-') {
            None => values.push(from_suffix(token)?),
            Some((start, end)) => {
                let mut current = from_suffix(start)?;
                let end = from_suffix(end)?;
                while current <= end {
                    values.push(current);
                    let next = f(current);
                    if next <= current {
                        break; // step saturated
                    }
                    current = next;
                }
            }
        }
    }
    Ok(values)
}

fn parse_interval(s: &str) -> std::result::Result<(u64, u64), ParseIssue> {
    if let Some(rest) = s.strip_prefix('-') {
        return Ok((0, from_suffix(rest)?));
    }
    let (low, high) = s.split_once('-').ok_or(ParseIssue::MalformedRange)?;
    Ok((from_suffix(low)?, from_suffix(high)?))
}

/// Compile one specification string according to its kind.
pub fn compile_one(kind: ParamKind, param: ParamName, value: &str) -> Result<Domain> {
    let domain = match kind {
        ParamKind::Plain => Domain::Scalar(from_suffix(value).map_err(parse_error(param, value))?),
        ParamKind::Pow2Range => Domain::Candidates(
            expand_range(value, |v| v.saturating_mul(2)).map_err(parse_error(param, value))?,
        ),
        ParamKind::Pow10Range => Domain::Candidates(
            expand_range(value, |v| v.saturating_mul(10)).map_err(parse_error(param, value))?,
        ),
        ParamKind::Interval => {
            let (low, high) = parse_interval(value).map_err(parse_error(param, value))?;
            Domain::Interval(low, high)
        }
    };
    Ok(domain)
}

/// Compile raw `(name, specification)` pairs into a full domain map.
///
/// Rejects unrecognized names, reports every missing required parameter
/// at once, defaults `minchainentries` to the candidate list `[4, 8]`
/// when absent, and fills every other absent optional with
/// [`Domain::Unset`]. Any parse error aborts the whole run.
pub fn compile(schema: &Schema, pairs: &[(&str, &str)]) -> Result<DomainMap> {
    let mut domains = DomainMap::new();
    for &(name, value) in pairs {
        let param = ParamName::from_str(name)?;
        let kind = schema
            .kind_of(param)
            .ok_or_else(|| CalcError::UnrecognizedParameter(name.to_string()))?;
        domains.insert(param, compile_one(kind, param, value)?);
    }

    let missing: Vec<ParamName> = schema
        .required()
        .iter()
        .copied()
        .filter(|name| !domains.contains_key(name))
        .collect();
    if !missing.is_empty() {
        return Err(CalcError::MissingRequired(missing));
    }

    domains
        .entry(ParamName::MinChainEntries)
        .or_insert_with(|| Domain::Candidates(vec![4, 8]));
    for name in schema.names() {
        domains.entry(name).or_insert(Domain::Unset);
    }

    tracing::debug!("compiled {} parameter domains", domains.len());
    Ok(domains)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pow2_range_expansion() {
        let domain = compile_one(ParamKind::Pow2Range, ParamName::BlockSize, "4-64").unwrap();
        assert_eq!(domain, Domain::Candidates(vec![4, 8, 16, 32, 64]));
    }

    #[test]
    fn test_pow2_range_unreachable_end() {
        // 5 is never reached by doubling; 8 exceeds it and stops the walk
        let domain = compile_one(ParamKind::Pow2Range, ParamName::BlockSize, "4-5").unwrap();
        assert_eq!(domain, Domain::Candidates(vec![4]));
    }

    #[test]
    fn test_pow2_range_single_scalar() {
        let domain = compile_one(ParamKind::Pow2Range, ParamName::BlockSize, "8").unwrap();
        assert_eq!(domain, Domain::Candidates(vec![8]));
    }

    #[test]
    fn test_pow2_range_start_equals_end() {
        let domain = compile_one(ParamKind::Pow2Range, ParamName::BlockSize, "16-16").unwrap();
        assert_eq!(domain, Domain::Candidates(vec![16]));
    }

    #[test]
    fn test_pow2_range_comma_union_preserves_order() {
        let domain =
            compile_one(ParamKind::Pow2Range, ParamName::BlockSize, "8,4-16,8").unwrap();
        assert_eq!(domain, Domain::Candidates(vec![8, 4, 8, 16, 8]));
    }

    #[test]
    fn test_pow10_range_expansion() {
        let domain =
            compile_one(ParamKind::Pow10Range, ParamName::CollisionInterval, "1-1000").unwrap();
        assert_eq!(domain, Domain::Candidates(vec![1, 10, 100, 1000]));
    }

    #[test]
    fn test_range_with_suffixes() {
        let domain = compile_one(ParamKind::Pow2Range, ParamName::MaxDataFile, "1g-4g").unwrap();
        let g = 1024u64.pow(3);
        assert_eq!(domain, Domain::Candidates(vec![g, 2 * g, 4 * g]));
    }

    #[test]
    fn test_interval_leading_dash() {
        let domain =
            compile_one(ParamKind::Interval, ParamName::MinMaxBlocksPerHead, "-100").unwrap();
        assert_eq!(domain, Domain::Interval(0, 100));
    }

    #[test]
    fn test_interval_pair() {
        let domain =
            compile_one(ParamKind::Interval, ParamName::MinMaxBlocksPerHead, "10-100").unwrap();
        assert_eq!(domain, Domain::Interval(10, 100));
    }

    #[test]
    fn test_interval_missing_dash() {
        let err =
            compile_one(ParamKind::Interval, ParamName::MinMaxBlocksPerHead, "100").unwrap_err();
        assert!(matches!(
            err,
            CalcError::Parse {
                issue: ParseIssue::MalformedRange,
                ..
            }
        ));
    }

    #[test]
    fn test_plain_with_suffix() {
        let domain = compile_one(ParamKind::Plain, ParamName::MaxTotalMem, "512m").unwrap();
        assert_eq!(domain, Domain::Scalar(512 * 1024 * 1024));
    }

    #[test]
    fn test_bad_suffix_names_the_parameter() {
        let err = compile_one(ParamKind::Plain, ParamName::MaxInitMem, "3x").unwrap_err();
        match err {
            CalcError::Parse { param, value, issue } => {
                assert_eq!(param, ParamName::MaxInitMem);
                assert_eq!(value, "3x");
                assert_eq!(issue, ParseIssue::BadSuffix);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_compile_fills_defaults() -> Result<()> {
        let schema = Schema::block_store();
        let domains = compile(
            &schema,
            &[
                ("maxdatafile", "1g"),
                ("blocksize", "4k"),
                ("collisioninterval", "1000"),
            ],
        )?;

        assert_eq!(domains.len(), 7);
        assert_eq!(
            domains[&ParamName::MinChainEntries],
            Domain::Candidates(vec![4, 8])
        );
        assert_eq!(domains[&ParamName::MaxInitMem], Domain::Unset);
        assert_eq!(domains[&ParamName::MinMaxBlocksPerHead], Domain::Unset);
        Ok(())
    }

    #[test]
    fn test_compile_reports_all_missing_required() {
        let schema = Schema::block_store();
        let err = compile(&schema, &[("blocksize", "4k")]).unwrap_err();
        match err {
            CalcError::MissingRequired(names) => {
                assert_eq!(
                    names,
                    vec![ParamName::MaxDataFile, ParamName::CollisionInterval]
                );
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_compile_rejects_unknown_names() {
        let schema = Schema::block_store();
        let err = compile(&schema, &[("blocksizes", "4k")]).unwrap_err();
        assert!(matches!(err, CalcError::UnrecognizedParameter(ref n) if n == "blocksizes"));
    }

    #[test]
    fn test_explicit_minchainentries_overrides_default() -> Result<()> {
        let schema = Schema::block_store();
        let domains = compile(
            &schema,
            &[
                ("maxdatafile", "1g"),
                ("blocksize", "4k"),
                ("collisioninterval", "1000"),
                ("minchainentries", "16"),
            ],
        )?;
        assert_eq!(
            domains[&ParamName::MinChainEntries],
            Domain::Candidates(vec![16])
        );
        Ok(())
    }
}
