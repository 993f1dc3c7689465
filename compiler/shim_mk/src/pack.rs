//! Greedy bin-packing of unit ids into nested static libraries.

use shim_diagnostic::ShimError;

use crate::MkOptions;

/// Nesting depth past which packing gives up.
pub const MAX_DEPTH: usize = 32;

/// One library of the plan.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Library {
    pub id: String,
    /// Members are source files rather than other libraries.
    pub holds_sources: bool,
    pub members: Vec<String>,
}

impl Library {
    /// Summed member id length, the quantity both budgets bound.
    pub fn member_length(&self) -> usize {
        total_length(&self.members)
    }
}

/// Every library to build. Static libraries come in dependency order:
/// a library only names libraries listed before it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuildPlan {
    pub static_libraries: Vec<Library>,
    pub shared: Library,
}

/// Packs unit ids under the character budgets of [`MkOptions`].
///
/// Holds no state between calls; every [`pack`](Self::pack) starts fresh.
#[derive(Clone, Debug)]
pub struct BuildScriptEmitter {
    options: MkOptions,
}

impl BuildScriptEmitter {
    pub fn new(options: MkOptions) -> Self {
        BuildScriptEmitter { options }
    }

    pub fn options(&self) -> &MkOptions {
        &self.options
    }

    /// Group `units` into static libraries no longer than the static budget,
    /// repeating on the group names until the top level fits the shared
    /// budget.
    ///
    /// Each level must shrink the summed id length. A level that does not
    /// shrink, or a single unit longer than the static budget, is reported
    /// as [`ShimError::BudgetMisconfiguration`].
    #[tracing::instrument(level = "debug", skip_all, fields(units = units.len()))]
    pub fn pack(&self, units: &[String]) -> Result<BuildPlan, ShimError> {
        let (static_limit, shared_limit) = (self.options.static_limit, self.options.shared_limit);
        if static_limit == 0 || shared_limit == 0 {
            return Err(misconfigured("character limits must be positive".to_owned()));
        }
        if let Some(unit) = units.iter().find(|u| u.len() > static_limit) {
            return Err(misconfigured(format!(
                "`{unit}` alone is longer than the static library limit of {static_limit}"
            )));
        }

        let mut static_libraries = Vec::new();
        let mut current = units.to_vec();
        let mut depth = 0;
        loop {
            let groups = self.group(&current);
            let outer = if groups.len() <= 1 {
                // Everything fit in one group: no wrapper library.
                current.clone()
            } else {
                let holds_sources = depth == 0;
                let mut names = Vec::with_capacity(groups.len());
                for (index, members) in groups.into_iter().enumerate() {
                    let id = format!("{}_partial_{depth}_{index}", self.options.id);
                    names.push(id.clone());
                    static_libraries.push(Library {
                        id,
                        holds_sources,
                        members,
                    });
                }
                names
            };

            let length = total_length(&outer);
            tracing::debug!(depth, libraries = outer.len(), length, "packed level");
            if length <= shared_limit && (depth == 0 || length <= static_limit) {
                let shared = self.finish(outer, depth, &mut static_libraries);
                return Ok(BuildPlan {
                    static_libraries,
                    shared,
                });
            }

            let previous = total_length(&current);
            if length >= previous {
                return Err(misconfigured(format!(
                    "level {depth} does not shrink ({previous} to {length} characters) \
                     under limits {static_limit}/{shared_limit}"
                )));
            }
            if let Some(name) = outer.iter().find(|n| n.len() > static_limit) {
                return Err(misconfigured(format!(
                    "library name `{name}` is longer than the static library limit of {static_limit}"
                )));
            }
            depth += 1;
            if depth > MAX_DEPTH {
                return Err(misconfigured(format!("more than {MAX_DEPTH} nesting levels")));
            }
            current = outer;
        }
    }

    /// Greedy pass: start a new group whenever the next id would push the
    /// current one past the static limit. The last group is always kept.
    fn group(&self, ids: &[String]) -> Vec<Vec<String>> {
        let mut groups = Vec::new();
        let mut group: Vec<String> = Vec::new();
        let mut length = 0;
        for id in ids {
            if !group.is_empty() && length + id.len() > self.options.static_limit {
                groups.push(std::mem::take(&mut group));
                length = 0;
            }
            length += id.len();
            group.push(id.clone());
        }
        if !group.is_empty() {
            groups.push(group);
        }
        groups
    }

    /// The final aggregate. At depth 0 it is the shared library itself;
    /// deeper, it becomes one more static library the shared one links.
    fn finish(&self, outer: Vec<String>, depth: usize, libraries: &mut Vec<Library>) -> Library {
        if depth == 0 {
            let holds_sources = libraries.is_empty();
            return Library {
                id: self.options.id.clone(),
                holds_sources,
                members: outer,
            };
        }
        let id = format!("{}_complete_{depth}", self.options.id);
        libraries.push(Library {
            id: id.clone(),
            holds_sources: false,
            members: outer,
        });
        Library {
            id: self.options.id.clone(),
            holds_sources: false,
            members: vec![id],
        }
    }
}

fn total_length(ids: &[String]) -> usize {
    ids.iter().map(String::len).sum()
}

fn misconfigured(reason: String) -> ShimError {
    ShimError::BudgetMisconfiguration { reason }
}
