//! Command-line token grammar.
//!
//! The surface is token-based rather than flag-based: `group`, `sort`, and
//! `order` each consume exactly one following token as their argument,
//! repeats overwrite the prior setting for that field only, `help` prints
//! the usage text before any processing, and every other token is an input
//! file path, read in argument order. Subcommand keywords are recognized
//! case-insensitively; argument values are exact.

use std::path::PathBuf;

use crate::config::{GroupBy, ModeSpec, OrderDirection, SortMetric};
use crate::error::{NetsortError, Result};

/// Usage text printed by the `help` subcommand.
pub const USAGE: &str = "\
netsort - group, sort, and report network traffic from packet metadata

USAGE:
    netsort help
    netsort metadataFile...
    netsort [group <src|dest|connect|conversation|proto>]
            [sort <packets|bytes>] [order <low|high|sequence>] metadataFile...

SUBCOMMANDS:
    help    Print this help message.

    group   Group packets per the following argument; repeats overwrite.
                src           (default) source address
                dest          destination address
                connect       source -> destination pairing; a -> b is
                              separate from b -> a
                conversation  source/destination socket 4-tuple
                              (src.addr, src.port, dest.addr, dest.port)
                proto         protocol
    sort    Sort packet groups per the following argument; repeats overwrite.
                packets       (default) number of packets for group
                bytes         total bytes sent for group
    order   Order output per the following argument; repeats overwrite.
                low           (default) numerical low to high
                high          numerical high to low
                sequence      conversation start sequence; only available
                              with 'group conversation'

All other tokens are input file paths, read in argument order. Input is CSV
packet metadata with a header row, in the 6-column or 9-column layout.
";

/// A resolved invocation: mode updates, input files, and whether `help`
/// short-circuited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliRequest {
    pub mode: ModeSpec,
    pub inputs: Vec<PathBuf>,
    pub show_help: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Keyword {
    Group,
    Sort,
    Order,
    Help,
}

impl Keyword {
    fn name(self) -> &'static str {
        match self {
            Keyword::Group => "group",
            Keyword::Sort => "sort",
            Keyword::Order => "order",
            Keyword::Help => "help",
        }
    }
}

/// Derive a subcommand keyword from a token, if it is one.
fn derive_keyword(token: &str) -> Option<Keyword> {
    for keyword in [Keyword::Group, Keyword::Sort, Keyword::Order, Keyword::Help] {
        if token.eq_ignore_ascii_case(keyword.name()) {
            return Some(keyword);
        }
    }
    None
}

fn usage_error(keyword: Keyword, reason: String) -> NetsortError {
    NetsortError::Usage {
        subcommand: keyword.name().to_string(),
        reason,
    }
}

/// Apply one subcommand argument to the mode under construction. Each
/// subcommand overwrites exactly its own field.
fn apply_argument(mode: ModeSpec, keyword: Keyword, argument: &str) -> Result<ModeSpec> {
    let unknown = |_| usage_error(keyword, format!("unknown value '{argument}'"));
    match keyword {
        Keyword::Group => {
            let group_by: GroupBy = argument.parse().map_err(unknown)?;
            Ok(mode.with_group_by(group_by))
        }
        Keyword::Sort => {
            let sort_metric: SortMetric = argument.parse().map_err(unknown)?;
            Ok(mode.with_sort_metric(sort_metric))
        }
        Keyword::Order => {
            let order: OrderDirection = argument.parse().map_err(unknown)?;
            Ok(mode.with_order(order))
        }
        Keyword::Help => unreachable!("help consumes no argument"),
    }
}

/// Resolve the raw token list into mode updates and input files.
pub fn parse_tokens(tokens: &[String]) -> Result<CliRequest> {
    let mut mode = ModeSpec::UNSET;
    let mut inputs = Vec::new();

    let mut iter = tokens.iter();
    while let Some(token) = iter.next() {
        match derive_keyword(token) {
            Some(Keyword::Help) => {
                return Ok(CliRequest {
                    mode,
                    inputs,
                    show_help: true,
                })
            }
            Some(keyword) => {
                let argument = iter
                    .next()
                    .ok_or_else(|| usage_error(keyword, "missing argument".to_string()))?;
                mode = apply_argument(mode, keyword, argument)?;
            }
            None => inputs.push(PathBuf::from(token)),
        }
    }

    Ok(CliRequest {
        mode,
        inputs,
        show_help: false,
    })
}
