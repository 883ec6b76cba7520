//! Computed group state and command routing.

use crate::error::GroupError;
use crate::functions::{Equality, FunctionRegistry, GroupFunction};
use crate::membership::members_of;
use fxhash::FxHashSet;
use hearth_domain::{Command, Item, ItemBody, ItemName, State};
use std::sync::Arc;
use tracing::warn;

/// Computes the aggregated state of `group` from the current item set.
///
/// Simple members contribute their stored state; member groups contribute
/// their own computed state, recursively. A group with neither a base item
/// nor a function reports [`State::Undef`]. Cycles in the membership graph
/// contribute `Undef` at the point of re-entry.
#[must_use]
pub fn compute_state(group: &Item, all: &[Arc<Item>], functions: &FunctionRegistry) -> State {
    let mut in_progress = FxHashSet::default();
    compute_inner(group, all, functions, &mut in_progress)
}

fn compute_inner(
    group: &Item,
    all: &[Arc<Item>],
    functions: &FunctionRegistry,
    in_progress: &mut FxHashSet<String>,
) -> State {
    let ItemBody::Group { base, function } = &group.body else {
        // Not a group: the item's own state is the answer.
        return group.state().cloned().unwrap_or(State::Undef);
    };

    if base.is_none() && function.is_none() {
        return State::Undef;
    }
    if !in_progress.insert(group.name.as_str().to_owned()) {
        return State::Undef;
    }

    let combinator = resolve_or_default(group.name.as_str(), function.as_ref(), functions);

    let states: Vec<State> = members_of(group.name.as_str(), all)
        .into_iter()
        .map(|member| {
            if member.is_group() {
                compute_inner(member, all, functions, in_progress)
            } else {
                member.state().cloned().unwrap_or(State::Undef)
            }
        })
        .collect();

    in_progress.remove(group.name.as_str());
    combinator.calculate(&states)
}

/// Routes a command sent to `group` into per-member commands.
///
/// The group's function may rewrite the command for its members; functions
/// that do not decompose forward the original command verbatim.
#[must_use]
pub fn route_command(
    group: &Item,
    all: &[Arc<Item>],
    command: &Command,
    functions: &FunctionRegistry,
) -> Vec<(ItemName, Command)> {
    let ItemBody::Group { function, .. } = &group.body else {
        return Vec::new();
    };

    let combinator = resolve_or_default(group.name.as_str(), function.as_ref(), functions);
    let per_member = combinator.decompose(command).unwrap_or_else(|| command.clone());

    members_of(group.name.as_str(), all)
        .into_iter()
        .map(|member| (member.name.clone(), per_member.clone()))
        .collect()
}

fn resolve_or_default(
    group: &str,
    function: Option<&hearth_domain::GroupFunctionSpec>,
    functions: &FunctionRegistry,
) -> Arc<dyn GroupFunction> {
    function.map_or_else(
        || Arc::new(Equality) as Arc<dyn GroupFunction>,
        |spec| match functions.resolve(spec) {
            Ok(f) => f,
            Err(GroupError::BadParams { message, .. }) => {
                warn!(group, %message, "Group function parameters rejected, using EQUALITY");
                Arc::new(Equality)
            },
            Err(err) => {
                warn!(group, %err, "Group function resolution failed, using EQUALITY");
                Arc::new(Equality)
            },
        },
    )
}
