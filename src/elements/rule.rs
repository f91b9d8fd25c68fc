use super::{reference_handles, ElementTag, Markup, Property};
use crate::list::{Container, ElementList, IdentifiableElementList};
use crate::reference::Reference;
use crate::registry::{ElementId, RefHandle};
use crate::values::{Comparator, LogicalOperator};
use crate::writer::Attributes;

/// A `<ruleBase>`: rules used by switches and presentation control.
#[derive(Debug, Default)]
pub struct RuleBase {
    imports: ElementList,
    rules: IdentifiableElementList,
}

impl RuleBase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn imports(&self) -> &ElementList {
        &self.imports
    }

    /// Rules and composite rules, in declaration order.
    pub fn rules(&self) -> &IdentifiableElementList {
        &self.rules
    }
}

impl Markup for RuleBase {
    fn attributes(&self, _attrs: &mut Attributes<'_>) {}

    fn children(&self) -> Vec<ElementId> {
        self.imports.iter().chain(self.rules.iter()).copied().collect()
    }

    fn container(&mut self, child: ElementTag) -> Option<Container<'_>> {
        match child {
            ElementTag::ImportBase => Some(Container::List(&mut self.imports)),
            ElementTag::Rule | ElementTag::CompositeRule => {
                Some(Container::Identified(&mut self.rules))
            }
            _ => None,
        }
    }
}

/// A `<rule>` comparing a settings property against a value.
///
/// `var` renders the property's name.
#[derive(Debug, Default)]
pub struct Rule {
    pub var: Option<Reference<Property>>,
    pub comparator: Option<Comparator>,
    pub value: Option<String>,
}

impl Rule {
    pub fn new(comparator: Comparator, value: &str) -> Self {
        Rule {
            var: None,
            comparator: Some(comparator),
            value: Some(value.to_string()),
        }
    }
}

impl Markup for Rule {
    fn attributes(&self, attrs: &mut Attributes<'_>) {
        attrs.reference("var", self.var.as_ref());
        attrs.value("comparator", self.comparator);
        attrs.text("value", self.value.as_deref());
    }

    fn references(&self) -> Vec<RefHandle> {
        reference_handles!(self.var)
    }
}

/// A `<compositeRule>` combining nested rules.
#[derive(Debug, Default)]
pub struct CompositeRule {
    pub operator: Option<LogicalOperator>,
    rules: IdentifiableElementList,
}

impl CompositeRule {
    pub fn new(operator: LogicalOperator) -> Self {
        CompositeRule {
            operator: Some(operator),
            rules: IdentifiableElementList::new(),
        }
    }

    pub fn rules(&self) -> &IdentifiableElementList {
        &self.rules
    }
}

impl Markup for CompositeRule {
    fn attributes(&self, attrs: &mut Attributes<'_>) {
        attrs.value("operator", self.operator);
    }

    fn children(&self) -> Vec<ElementId> {
        self.rules.iter().copied().collect()
    }

    fn container(&mut self, child: ElementTag) -> Option<Container<'_>> {
        match child {
            ElementTag::Rule | ElementTag::CompositeRule => {
                Some(Container::Identified(&mut self.rules))
            }
            _ => None,
        }
    }
}
