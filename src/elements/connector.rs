use super::{ElementTag, Markup};
use crate::list::{Container, ElementList, IdentifiableElementList};
use crate::registry::ElementId;
use crate::values::{
    ActionOperator, ActionType, EventTransition, EventType, LogicalOperator, Seconds,
};
use crate::writer::Attributes;

/// A `<connectorBase>`.
#[derive(Debug, Default)]
pub struct ConnectorBase {
    imports: ElementList,
    connectors: IdentifiableElementList,
}

impl ConnectorBase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn imports(&self) -> &ElementList {
        &self.imports
    }

    pub fn connectors(&self) -> &IdentifiableElementList {
        &self.connectors
    }
}

impl Markup for ConnectorBase {
    fn attributes(&self, _attrs: &mut Attributes<'_>) {}

    fn children(&self) -> Vec<ElementId> {
        self.imports
            .iter()
            .chain(self.connectors.iter())
            .copied()
            .collect()
    }

    fn container(&mut self, child: ElementTag) -> Option<Container<'_>> {
        match child {
            ElementTag::ImportBase => Some(Container::List(&mut self.imports)),
            ElementTag::CausalConnector => Some(Container::Identified(&mut self.connectors)),
            _ => None,
        }
    }
}

/// A `<causalConnector>`: when the condition holds, run the action.
#[derive(Debug, Default)]
pub struct CausalConnector {
    params: ElementList,
    condition: Option<ElementId>,
    action: Option<ElementId>,
}

impl CausalConnector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn params(&self) -> &ElementList {
        &self.params
    }

    pub fn condition(&self) -> Option<ElementId> {
        self.condition
    }

    pub fn action(&self) -> Option<ElementId> {
        self.action
    }
}

impl Markup for CausalConnector {
    fn attributes(&self, _attrs: &mut Attributes<'_>) {}

    fn children(&self) -> Vec<ElementId> {
        self.params
            .iter()
            .copied()
            .chain(self.condition)
            .chain(self.action)
            .collect()
    }

    fn container(&mut self, child: ElementTag) -> Option<Container<'_>> {
        match child {
            ElementTag::ConnectorParam => Some(Container::List(&mut self.params)),
            ElementTag::SimpleCondition | ElementTag::CompoundCondition => {
                Some(Container::Slot(&mut self.condition))
            }
            ElementTag::SimpleAction | ElementTag::CompoundAction => {
                Some(Container::Slot(&mut self.action))
            }
            _ => None,
        }
    }
}

/// A `<connectorParam>` declaring a parameter links may set.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectorParam {
    pub name: String,
    pub param_type: Option<String>,
}

impl ConnectorParam {
    pub fn new(name: &str) -> Self {
        ConnectorParam {
            name: name.to_string(),
            param_type: None,
        }
    }
}

impl Markup for ConnectorParam {
    fn attributes(&self, attrs: &mut Attributes<'_>) {
        attrs.text("name", Some(&self.name));
        attrs.text("type", self.param_type.as_deref());
    }
}

/// A `<simpleCondition>` role.
#[derive(Debug, Clone, PartialEq)]
pub struct SimpleCondition {
    pub role: String,
    pub delay: Option<Seconds>,
    pub event_type: Option<EventType>,
    pub key: Option<String>,
    pub transition: Option<EventTransition>,
    pub min: Option<u32>,
    /// A count or `unbounded`.
    pub max: Option<String>,
    pub qualifier: Option<LogicalOperator>,
}

impl SimpleCondition {
    pub fn new(role: &str) -> Self {
        SimpleCondition {
            role: role.to_string(),
            delay: None,
            event_type: None,
            key: None,
            transition: None,
            min: None,
            max: None,
            qualifier: None,
        }
    }
}

impl Markup for SimpleCondition {
    fn attributes(&self, attrs: &mut Attributes<'_>) {
        attrs.text("role", Some(&self.role));
        attrs.value("delay", self.delay);
        attrs.value("eventType", self.event_type);
        attrs.text("key", self.key.as_deref());
        attrs.value("transition", self.transition);
        attrs.value("min", self.min);
        attrs.text("max", self.max.as_deref());
        attrs.value("qualifier", self.qualifier);
    }
}

/// A `<compoundCondition>` combining nested conditions.
#[derive(Debug, Default)]
pub struct CompoundCondition {
    pub operator: Option<LogicalOperator>,
    pub delay: Option<Seconds>,
    conditions: ElementList,
}

impl CompoundCondition {
    pub fn new(operator: LogicalOperator) -> Self {
        CompoundCondition {
            operator: Some(operator),
            ..Self::default()
        }
    }

    pub fn conditions(&self) -> &ElementList {
        &self.conditions
    }
}

impl Markup for CompoundCondition {
    fn attributes(&self, attrs: &mut Attributes<'_>) {
        attrs.value("operator", self.operator);
        attrs.value("delay", self.delay);
    }

    fn children(&self) -> Vec<ElementId> {
        self.conditions.iter().copied().collect()
    }

    fn container(&mut self, child: ElementTag) -> Option<Container<'_>> {
        match child {
            ElementTag::SimpleCondition | ElementTag::CompoundCondition => {
                Some(Container::List(&mut self.conditions))
            }
            _ => None,
        }
    }
}

/// A `<simpleAction>` role.
#[derive(Debug, Clone, PartialEq)]
pub struct SimpleAction {
    pub role: String,
    pub delay: Option<Seconds>,
    pub event_type: Option<EventType>,
    pub action_type: Option<ActionType>,
    pub value: Option<String>,
    pub min: Option<u32>,
    pub max: Option<String>,
    pub qualifier: Option<ActionOperator>,
    pub repeat: Option<u32>,
    pub repeat_delay: Option<Seconds>,
    pub duration: Option<Seconds>,
    pub by: Option<String>,
}

impl SimpleAction {
    pub fn new(role: &str) -> Self {
        SimpleAction {
            role: role.to_string(),
            delay: None,
            event_type: None,
            action_type: None,
            value: None,
            min: None,
            max: None,
            qualifier: None,
            repeat: None,
            repeat_delay: None,
            duration: None,
            by: None,
        }
    }
}

impl Markup for SimpleAction {
    fn attributes(&self, attrs: &mut Attributes<'_>) {
        attrs.text("role", Some(&self.role));
        attrs.value("delay", self.delay);
        attrs.value("eventType", self.event_type);
        attrs.value("actionType", self.action_type);
        attrs.text("value", self.value.as_deref());
        attrs.value("min", self.min);
        attrs.text("max", self.max.as_deref());
        attrs.value("qualifier", self.qualifier);
        attrs.value("repeat", self.repeat);
        attrs.value("repeatDelay", self.repeat_delay);
        attrs.value("duration", self.duration);
        attrs.text("by", self.by.as_deref());
    }
}

/// A `<compoundAction>` running nested actions in parallel or in sequence.
#[derive(Debug, Default)]
pub struct CompoundAction {
    pub operator: Option<ActionOperator>,
    pub delay: Option<Seconds>,
    actions: ElementList,
}

impl CompoundAction {
    pub fn new(operator: ActionOperator) -> Self {
        CompoundAction {
            operator: Some(operator),
            ..Self::default()
        }
    }

    pub fn actions(&self) -> &ElementList {
        &self.actions
    }
}

impl Markup for CompoundAction {
    fn attributes(&self, attrs: &mut Attributes<'_>) {
        attrs.value("operator", self.operator);
        attrs.value("delay", self.delay);
    }

    fn children(&self) -> Vec<ElementId> {
        self.actions.iter().copied().collect()
    }

    fn container(&mut self, child: ElementTag) -> Option<Container<'_>> {
        match child {
            ElementTag::SimpleAction | ElementTag::CompoundAction => {
                Some(Container::List(&mut self.actions))
            }
            _ => None,
        }
    }
}
