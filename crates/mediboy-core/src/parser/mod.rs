pub mod engine;
pub mod rule;
pub mod standard;

pub use engine::{extract, RuleTable};
pub use rule::{
    Candidate, Filter, Groups, Pattern, PostFilter, PostProcess, Relation, Rule, Selection,
    SEPARATOR,
};
pub use standard::standard_rules;
