//! Flattening of option items into argv tokens.

use std::sync::Arc;

use tracing::trace;

use crate::option::{FlagMapping, FlagValue, OptionItem, SequenceElement};

/// Strategy that turns a flag mapping into argv tokens.
pub type Transform = Arc<dyn Fn(&FlagMapping) -> Vec<String> + Send + Sync>;

pub const CWD_KEY: &str = "cwd";
pub const QUIET_KEY: &str = "quiet";
pub const PRINT_COMMAND_KEY: &str = "printCommand";

/// Control keys taken from the first option item of a call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ControlKeys {
    pub cwd: Option<String>,
    pub quiet: Option<bool>,
    pub print_command: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormattedArgs {
    pub args: Vec<String>,
    pub control: ControlKeys,
}

pub fn default_transform() -> Transform {
    Arc::new(flatten_flags)
}

/// Default flattening: `true` becomes a bare flag, truthy values become a
/// flag followed by the value, `false` and falsy values are dropped.
/// Single-character names take one dash, longer names two.
pub fn flatten_flags(flags: &FlagMapping) -> Vec<String> {
    let mut args = Vec::new();
    for (name, value) in flags.iter() {
        match value {
            FlagValue::Bool(true) => args.push(flag_token(name)),
            FlagValue::Bool(false) => {}
            v if v.is_truthy() => {
                args.push(flag_token(name));
                args.push(v.to_string());
            }
            _ => {}
        }
    }
    args
}

fn flag_token(name: &str) -> String {
    if name.chars().count() == 1 {
        format!("-{}", name)
    } else {
        format!("--{}", name)
    }
}

/// Formats a call's option items. Only the first item's flag mapping has its
/// control keys extracted and goes through `transform`; every other mapping
/// uses [`flatten_flags`].
pub fn format_options<F>(options: &[OptionItem], transform: F) -> FormattedArgs
where
    F: Fn(&FlagMapping) -> Vec<String>,
{
    let mut out = FormattedArgs::default();

    for (idx, item) in options.iter().enumerate() {
        match item {
            OptionItem::Sequence(elements) => {
                for element in elements {
                    match element {
                        SequenceElement::Flags(flags) => out.args.extend(flatten_flags(flags)),
                        SequenceElement::Arg(arg) => out.args.push(arg.clone()),
                        SequenceElement::Ignored(value) => {
                            trace!(%value, "ignoring sequence element");
                        }
                    }
                }
            }
            OptionItem::Flags(flags) if idx == 0 => {
                let (control, rest) = split_control_keys(flags);
                out.control = control;
                out.args.extend(transform(&rest));
            }
            OptionItem::Flags(flags) => out.args.extend(flatten_flags(flags)),
            OptionItem::Arg(arg) => out.args.push(arg.clone()),
            OptionItem::Ignored(value) => {
                trace!(%value, position = idx, "ignoring option item");
            }
        }
    }

    out
}

fn split_control_keys(flags: &FlagMapping) -> (ControlKeys, FlagMapping) {
    let mut rest = flags.clone();
    let control = ControlKeys {
        cwd: rest.remove(CWD_KEY).and_then(|v| match v {
            FlagValue::Null => None,
            other => Some(other.to_string()),
        }),
        quiet: rest.remove(QUIET_KEY).map(|v| v.is_true()),
        print_command: rest.remove(PRINT_COMMAND_KEY).map(|v| v.is_true()),
    };
    (control, rest)
}
