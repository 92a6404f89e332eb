//! Boolean composition of conditions

use super::{Condition, SharedCondition};
use dao_types::Ballot;

/// All children must hold. Progress is the weakest child's signal.
///
/// With no children, `And` is vacuously satisfied (`signal = 1.0`).
#[derive(Clone, Debug, Default)]
pub struct And {
    children: Vec<SharedCondition>,
}

impl And {
    pub fn new(children: Vec<SharedCondition>) -> Self {
        Self { children }
    }

    pub fn children(&self) -> &[SharedCondition] {
        &self.children
    }
}

impl Condition for And {
    fn eval(&self, ballot: &Ballot) -> bool {
        self.children.iter().all(|child| child.eval(ballot))
    }

    fn signal(&self, ballot: &Ballot) -> f64 {
        self.children
            .iter()
            .map(|child| child.signal(ballot))
            .fold(1.0, f64::min)
    }

    fn render(&self) -> String {
        render_group("And", self.children.iter().map(|c| c.render()))
    }

    fn render_with_votes(&self, ballot: &Ballot) -> String {
        render_group(
            "And",
            self.children.iter().map(|c| c.render_with_votes(ballot)),
        )
    }
}

/// Any child may hold. Progress is the strongest child's signal.
///
/// With no children, `Or` is never satisfied (`signal = 0.0`).
#[derive(Clone, Debug, Default)]
pub struct Or {
    children: Vec<SharedCondition>,
}

impl Or {
    pub fn new(children: Vec<SharedCondition>) -> Self {
        Self { children }
    }

    pub fn children(&self) -> &[SharedCondition] {
        &self.children
    }
}

impl Condition for Or {
    fn eval(&self, ballot: &Ballot) -> bool {
        self.children.iter().any(|child| child.eval(ballot))
    }

    fn signal(&self, ballot: &Ballot) -> f64 {
        self.children
            .iter()
            .map(|child| child.signal(ballot))
            .fold(0.0, f64::max)
    }

    fn render(&self) -> String {
        render_group("Or", self.children.iter().map(|c| c.render()))
    }

    fn render_with_votes(&self, ballot: &Ballot) -> String {
        render_group(
            "Or",
            self.children.iter().map(|c| c.render_with_votes(ballot)),
        )
    }
}

fn render_group(name: &str, parts: impl Iterator<Item = String>) -> String {
    format!("{name}({})", parts.collect::<Vec<_>>().join(", "))
}
