//! The three built-in policies (§4.6, §9): `semver-default`, `read-only`
//! (covariant positions only - return types, readonly properties) and
//! `write-only` (contravariant positions - parameter types, writable
//! properties). Each is a plain ordered `Vec<Rule>`; selecting one is a
//! matter of picking which function the CLI's `--policy` flag calls.
//!
//! Rules are listed most-specific first. A change that falls through every
//! rule gets the policy's `default`, which is `Major` in all three - an
//! unrecognized change is treated as breaking until proven otherwise, per
//! the conservative stance recorded in SPEC_FULL.md §9.

use super::{Policy, Rule, RuleMatchers, ReleaseType};
use crate::model::{Action, Aspect, ChangeTag, Impact, NodeKind, Target};

/// The default policy: symmetric, no read/write distinction. This is what
/// `apidiff` runs under when `--policy` is omitted.
pub fn semver_default() -> Policy {
    Policy {
        name: "semver-default",
        default: ReleaseType::Major,
        rules: vec![
            Rule {
                name: "export-removed",
                matchers: RuleMatchers {
                    target: Some(Target::Export),
                    action: Some(Action::Removed),
                    ..Default::default()
                },
                release_type: ReleaseType::Major,
                rationale: "a removed export breaks every import of it",
            },
            Rule {
                name: "export-renamed",
                matchers: RuleMatchers {
                    action: Some(Action::Renamed),
                    ..Default::default()
                },
                release_type: ReleaseType::Major,
                rationale: "a rename breaks every import using the old name",
            },
            Rule {
                name: "required-parameter-added",
                matchers: RuleMatchers {
                    target: Some(Target::Parameter),
                    action: Some(Action::Added),
                    has_tag: Some(ChangeTag::NowRequired),
                    ..Default::default()
                },
                release_type: ReleaseType::Major,
                rationale: "a new required parameter breaks every existing call site",
            },
            Rule {
                name: "optional-parameter-added",
                matchers: RuleMatchers {
                    target: Some(Target::Parameter),
                    action: Some(Action::Added),
                    has_tag: Some(ChangeTag::NowOptional),
                    ..Default::default()
                },
                release_type: ReleaseType::Minor,
                rationale: "a new optional parameter is backward compatible",
            },
            Rule {
                name: "required-parameter-removed",
                matchers: RuleMatchers {
                    target: Some(Target::Parameter),
                    action: Some(Action::Removed),
                    ..Default::default()
                },
                release_type: ReleaseType::Major,
                rationale: "removing a parameter a caller may be passing is breaking",
            },
            Rule {
                name: "parameters-reordered",
                matchers: RuleMatchers {
                    target: Some(Target::Parameter),
                    action: Some(Action::Reordered),
                    ..Default::default()
                },
                release_type: ReleaseType::Major,
                rationale: "positional call sites silently pass the wrong argument to the wrong parameter",
            },
            Rule {
                name: "type-parameter-added",
                matchers: RuleMatchers {
                    target: Some(Target::TypeParameter),
                    action: Some(Action::Added),
                    ..Default::default()
                },
                release_type: ReleaseType::Minor,
                rationale: "a new type parameter widens the generic surface without forcing callers to specify it",
            },
            Rule {
                name: "type-parameter-removed",
                matchers: RuleMatchers {
                    target: Some(Target::TypeParameter),
                    action: Some(Action::Removed),
                    ..Default::default()
                },
                release_type: ReleaseType::Major,
                rationale: "removing a type parameter breaks explicit instantiations",
            },
            Rule {
                name: "enum-value-changed",
                matchers: RuleMatchers {
                    aspect: Some(Aspect::EnumValue),
                    ..Default::default()
                },
                release_type: ReleaseType::Major,
                rationale: "a changed enum member value breaks serialized or compared values",
            },
            Rule {
                name: "type-alias-widened",
                matchers: RuleMatchers {
                    node_kind: Some(NodeKind::TypeAlias),
                    aspect: Some(Aspect::Type),
                    impact: Some(Impact::Widening),
                    ..Default::default()
                },
                release_type: ReleaseType::Major,
                rationale: "exhaustive matches (e.g. a switch over a union) over a standalone type alias stop being exhaustive when it grows a member",
            },
            Rule {
                name: "type-narrowed",
                matchers: RuleMatchers {
                    aspect: Some(Aspect::Type),
                    impact: Some(Impact::Narrowing),
                    ..Default::default()
                },
                release_type: ReleaseType::Major,
                rationale: "a narrower type rejects values the old type accepted",
            },
            Rule {
                name: "type-widened",
                matchers: RuleMatchers {
                    aspect: Some(Aspect::Type),
                    impact: Some(Impact::Widening),
                    ..Default::default()
                },
                release_type: ReleaseType::Minor,
                rationale: "a wider type is a backward-compatible superset",
            },
            Rule {
                name: "type-unrelated",
                matchers: RuleMatchers {
                    aspect: Some(Aspect::Type),
                    impact: Some(Impact::Unrelated),
                    ..Default::default()
                },
                release_type: ReleaseType::Major,
                rationale: "a disjoint type change is breaking by default",
            },
            Rule {
                name: "deprecation-added",
                matchers: RuleMatchers {
                    aspect: Some(Aspect::Deprecation),
                    impact: Some(Impact::Widening),
                    ..Default::default()
                },
                release_type: ReleaseType::Patch,
                rationale: "marking something deprecated changes nothing at runtime",
            },
            Rule {
                name: "deprecation-removed",
                matchers: RuleMatchers {
                    aspect: Some(Aspect::Deprecation),
                    impact: Some(Impact::Narrowing),
                    ..Default::default()
                },
                release_type: ReleaseType::Minor,
                rationale: "un-deprecating signals renewed support; not breaking, but worth a minor bump",
            },
            Rule {
                name: "readonly-added",
                matchers: RuleMatchers {
                    aspect: Some(Aspect::Readonly),
                    impact: Some(Impact::Narrowing),
                    ..Default::default()
                },
                release_type: ReleaseType::Major,
                rationale: "code that used to assign to this member no longer compiles",
            },
            Rule {
                name: "readonly-removed",
                matchers: RuleMatchers {
                    aspect: Some(Aspect::Readonly),
                    impact: Some(Impact::Widening),
                    ..Default::default()
                },
                release_type: ReleaseType::Minor,
                rationale: "a member becoming assignable is additive",
            },
            Rule {
                name: "became-required",
                matchers: RuleMatchers {
                    aspect: Some(Aspect::Optionality),
                    has_tag: Some(ChangeTag::NowRequired),
                    ..Default::default()
                },
                release_type: ReleaseType::Major,
                rationale: "omitting a now-required member or argument stops compiling",
            },
            Rule {
                name: "became-optional",
                matchers: RuleMatchers {
                    aspect: Some(Aspect::Optionality),
                    has_tag: Some(ChangeTag::NowOptional),
                    ..Default::default()
                },
                release_type: ReleaseType::Minor,
                rationale: "existing call sites that always supplied the value keep working",
            },
            Rule {
                name: "became-abstract",
                matchers: RuleMatchers {
                    aspect: Some(Aspect::Abstractness),
                    impact: Some(Impact::Narrowing),
                    ..Default::default()
                },
                release_type: ReleaseType::Major,
                rationale: "direct instantiation of a class that became abstract stops compiling",
            },
            Rule {
                name: "became-concrete",
                matchers: RuleMatchers {
                    aspect: Some(Aspect::Abstractness),
                    impact: Some(Impact::Widening),
                    ..Default::default()
                },
                release_type: ReleaseType::Minor,
                rationale: "a class becoming instantiable is additive",
            },
            Rule {
                name: "static-instance-flip",
                matchers: RuleMatchers {
                    aspect: Some(Aspect::Staticness),
                    ..Default::default()
                },
                release_type: ReleaseType::Major,
                rationale: "every call site addresses the member through the wrong qualifier",
            },
            Rule {
                name: "visibility-tightened",
                matchers: RuleMatchers {
                    aspect: Some(Aspect::Visibility),
                    ..Default::default()
                },
                release_type: ReleaseType::Major,
                rationale: "a member that became less visible is unreachable from existing call sites",
            },
            Rule {
                name: "constraint-narrowed",
                matchers: RuleMatchers {
                    aspect: Some(Aspect::Constraint),
                    impact: Some(Impact::Narrowing),
                    ..Default::default()
                },
                release_type: ReleaseType::Major,
                rationale: "a new constraint rejects type arguments that used to satisfy the parameter",
            },
            Rule {
                name: "constraint-widened",
                matchers: RuleMatchers {
                    aspect: Some(Aspect::Constraint),
                    impact: Some(Impact::Widening),
                    ..Default::default()
                },
                release_type: ReleaseType::Minor,
                rationale: "dropping a constraint accepts strictly more type arguments",
            },
            Rule {
                name: "default-type-removed",
                matchers: RuleMatchers {
                    aspect: Some(Aspect::DefaultType),
                    impact: Some(Impact::Narrowing),
                    ..Default::default()
                },
                release_type: ReleaseType::Major,
                rationale: "call sites relying on the implicit default now must specify it",
            },
            Rule {
                name: "default-type-added",
                matchers: RuleMatchers {
                    aspect: Some(Aspect::DefaultType),
                    impact: Some(Impact::Widening),
                    ..Default::default()
                },
                release_type: ReleaseType::Minor,
                rationale: "a new default lets existing explicit instantiations keep working and new ones omit the argument",
            },
            Rule {
                name: "default-value-removed",
                matchers: RuleMatchers {
                    aspect: Some(Aspect::DefaultValue),
                    impact: Some(Impact::Narrowing),
                    ..Default::default()
                },
                release_type: ReleaseType::Major,
                rationale: "call sites relying on the implicit default now must pass the argument explicitly",
            },
            Rule {
                name: "default-value-added",
                matchers: RuleMatchers {
                    aspect: Some(Aspect::DefaultValue),
                    impact: Some(Impact::Widening),
                    ..Default::default()
                },
                release_type: ReleaseType::Minor,
                rationale: "a new default lets existing callers keep passing the argument and new callers omit it",
            },
            Rule {
                name: "default-value-changed",
                matchers: RuleMatchers {
                    aspect: Some(Aspect::DefaultValue),
                    ..Default::default()
                },
                release_type: ReleaseType::Minor,
                rationale: "the argument's requiredness is unaffected; only the implicit value callers get changed",
            },
            Rule {
                name: "inheritance-gained",
                matchers: RuleMatchers {
                    impact: Some(Impact::Narrowing),
                    ..Default::default()
                },
                release_type: ReleaseType::Major,
                rationale: "a new base type or interface adds obligations implementers don't yet satisfy",
            },
            Rule {
                name: "inheritance-lost",
                matchers: RuleMatchers {
                    impact: Some(Impact::Widening),
                    ..Default::default()
                },
                release_type: ReleaseType::Minor,
                rationale: "losing a base type or interface only removes capability, never breaks implementers",
            },
            Rule {
                name: "equivalent-change",
                matchers: RuleMatchers {
                    impact: Some(Impact::Equivalent),
                    ..Default::default()
                },
                release_type: ReleaseType::None,
                rationale: "a change that resolves to no observable difference carries no release weight",
            },
        ],
    }
}

/// Covariant positions only: return types, readonly/read-facing properties,
/// enum members read by consumers. Growing the surface is safe; shrinking
/// it is not. Meant for APIs where the diffed symbol is only ever
/// *produced* by the library, never supplied by the caller (`diffOptions`
/// §6 `policy: "read-only"`).
pub fn read_only() -> Policy {
    let mut policy = semver_default();
    policy.name = "read-only";

    // A union gaining a member is a widening in a read position: a caller
    // that already handles the prior members still compiles, it just now
    // also needs to handle the new one to stay exhaustive - a minor bump
    // here by explicit design decision, not the `major` default policy
    // chooses for the same change (SPEC_FULL.md §9 open question).
    replace_rule(
        &mut policy,
        "type-alias-widened",
        Rule {
            name: "type-alias-widened",
            matchers: RuleMatchers {
                node_kind: Some(NodeKind::TypeAlias),
                aspect: Some(Aspect::Type),
                impact: Some(Impact::Widening),
                ..Default::default()
            },
            release_type: ReleaseType::Minor,
            rationale: "in a read-only position a grown union is additive for consumers, covariant by design",
        },
    );
    replace_rule(
        &mut policy,
        "required-parameter-added",
        Rule {
            name: "required-parameter-added",
            matchers: RuleMatchers {
                target: Some(Target::Parameter),
                action: Some(Action::Added),
                has_tag: Some(ChangeTag::NowRequired),
                ..Default::default()
            },
            release_type: ReleaseType::Minor,
            rationale: "read-only policy treats call-site shape as the host's concern, not this API's",
        },
    );
    replace_rule(
        &mut policy,
        "readonly-added",
        Rule {
            name: "readonly-added",
            matchers: RuleMatchers {
                aspect: Some(Aspect::Readonly),
                impact: Some(Impact::Narrowing),
                ..Default::default()
            },
            release_type: ReleaseType::Minor,
            rationale: "a read-only consumer never assigned to the member anyway",
        },
    );
    policy
}

/// Contravariant positions only: parameter types, writable/assignable
/// properties the caller populates. Shrinking what's accepted is safe;
/// growing it can surprise the writer. Meant for symbols only ever
/// *consumed*, never read, by this API (`diffOptions` §6
/// `policy: "write-only"`).
pub fn write_only() -> Policy {
    let mut policy = semver_default();
    policy.name = "write-only";

    replace_rule(
        &mut policy,
        "type-narrowed",
        Rule {
            name: "type-narrowed",
            matchers: RuleMatchers {
                aspect: Some(Aspect::Type),
                impact: Some(Impact::Narrowing),
                ..Default::default()
            },
            release_type: ReleaseType::Minor,
            rationale: "in a write-only position, accepting strictly less is the covariant-safe direction",
        },
    );
    replace_rule(
        &mut policy,
        "type-widened",
        Rule {
            name: "type-widened",
            matchers: RuleMatchers {
                aspect: Some(Aspect::Type),
                impact: Some(Impact::Widening),
                ..Default::default()
            },
            release_type: ReleaseType::Major,
            rationale: "accepting more than before forces the writer to handle cases it never had to before",
        },
    );
    replace_rule(
        &mut policy,
        "became-optional",
        Rule {
            name: "became-optional",
            matchers: RuleMatchers {
                aspect: Some(Aspect::Optionality),
                has_tag: Some(ChangeTag::NowOptional),
                ..Default::default()
            },
            release_type: ReleaseType::Patch,
            rationale: "a writer that always supplied the value is unaffected either way",
        },
    );
    policy
}

fn replace_rule(policy: &mut Policy, name: &'static str, rule: Rule) {
    if let Some(slot) = policy.rules.iter_mut().find(|r| r.name == name) {
        *slot = rule;
    } else {
        policy.rules.insert(0, rule);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ChangeDescriptor, NodeKind};

    #[test]
    fn export_removed_is_major_under_default() {
        let policy = semver_default();
        let descriptor = ChangeDescriptor::new(Target::Export, Action::Removed);
        let result = policy.classify(&descriptor, NodeKind::Function, false);
        assert_eq!(result.release_type, ReleaseType::Major);
        assert_eq!(result.matched_rule, Some("export-removed"));
    }

    #[test]
    fn required_parameter_added_is_major() {
        let policy = semver_default();
        let descriptor = ChangeDescriptor::new(Target::Parameter, Action::Added)
            .tagged(ChangeTag::NowRequired);
        let result = policy.classify(&descriptor, NodeKind::Parameter, true);
        assert_eq!(result.release_type, ReleaseType::Major);
    }

    #[test]
    fn optional_parameter_added_is_minor() {
        let policy = semver_default();
        let descriptor = ChangeDescriptor::new(Target::Parameter, Action::Added)
            .tagged(ChangeTag::NowOptional);
        let result = policy.classify(&descriptor, NodeKind::Parameter, true);
        assert_eq!(result.release_type, ReleaseType::Minor);
    }

    #[test]
    fn union_widening_on_type_alias_is_major_under_default_but_minor_under_read_only() {
        let descriptor = ChangeDescriptor::modified(Target::Export, Aspect::Type, Impact::Widening);

        let default_result = semver_default().classify(&descriptor, NodeKind::TypeAlias, false);
        assert_eq!(default_result.release_type, ReleaseType::Major);

        let read_only_result = read_only().classify(&descriptor, NodeKind::TypeAlias, false);
        assert_eq!(read_only_result.release_type, ReleaseType::Minor);
    }

    #[test]
    fn deprecation_added_is_patch_removed_is_minor() {
        let policy = semver_default();
        let added = ChangeDescriptor::modified(Target::Export, Aspect::Deprecation, Impact::Widening);
        let removed = ChangeDescriptor::modified(Target::Export, Aspect::Deprecation, Impact::Narrowing);
        assert_eq!(
            policy.classify(&added, NodeKind::Function, false).release_type,
            ReleaseType::Patch
        );
        assert_eq!(
            policy.classify(&removed, NodeKind::Function, false).release_type,
            ReleaseType::Minor
        );
    }

    #[test]
    fn return_type_narrowing_is_major_widening_is_minor() {
        let policy = semver_default();
        let narrowed = ChangeDescriptor::modified(Target::Export, Aspect::Type, Impact::Narrowing);
        let widened = ChangeDescriptor::modified(Target::Export, Aspect::Type, Impact::Widening);
        assert_eq!(
            policy.classify(&narrowed, NodeKind::Function, false).release_type,
            ReleaseType::Major
        );
        assert_eq!(
            policy.classify(&widened, NodeKind::Function, false).release_type,
            ReleaseType::Minor
        );
    }

    #[test]
    fn default_value_lost_is_major_gained_is_minor() {
        let policy = semver_default();
        let lost = ChangeDescriptor::modified(Target::Parameter, Aspect::DefaultValue, Impact::Narrowing);
        let gained = ChangeDescriptor::modified(Target::Parameter, Aspect::DefaultValue, Impact::Widening);
        assert_eq!(
            policy.classify(&lost, NodeKind::Parameter, true).release_type,
            ReleaseType::Major
        );
        assert_eq!(
            policy.classify(&gained, NodeKind::Parameter, true).release_type,
            ReleaseType::Minor
        );
    }

    #[test]
    fn write_only_policy_flips_type_change_direction() {
        let policy = write_only();
        let narrowed = ChangeDescriptor::modified(Target::Parameter, Aspect::Type, Impact::Narrowing);
        let widened = ChangeDescriptor::modified(Target::Parameter, Aspect::Type, Impact::Widening);
        assert_eq!(
            policy.classify(&narrowed, NodeKind::Parameter, true).release_type,
            ReleaseType::Minor
        );
        assert_eq!(
            policy.classify(&widened, NodeKind::Parameter, true).release_type,
            ReleaseType::Major
        );
    }
}
