use super::{ElementTag, Markup};
use crate::list::{Container, ElementList, IdentifiableElementList};
use crate::registry::ElementId;
use crate::values::{format_number, Color, Seconds, TransitionDirection, TransitionType};
use crate::writer::Attributes;

/// A `<transitionBase>`.
#[derive(Debug, Default)]
pub struct TransitionBase {
    imports: ElementList,
    transitions: IdentifiableElementList,
}

impl TransitionBase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn imports(&self) -> &ElementList {
        &self.imports
    }

    pub fn transitions(&self) -> &IdentifiableElementList {
        &self.transitions
    }
}

impl Markup for TransitionBase {
    fn attributes(&self, _attrs: &mut Attributes<'_>) {}

    fn children(&self) -> Vec<ElementId> {
        self.imports
            .iter()
            .chain(self.transitions.iter())
            .copied()
            .collect()
    }

    fn container(&mut self, child: ElementTag) -> Option<Container<'_>> {
        match child {
            ElementTag::ImportBase => Some(Container::List(&mut self.imports)),
            ElementTag::Transition => Some(Container::Identified(&mut self.transitions)),
            _ => None,
        }
    }
}

/// A `<transition>` effect.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transition {
    pub transition_type: Option<TransitionType>,
    pub subtype: Option<String>,
    pub dur: Option<Seconds>,
    pub start_progress: Option<f64>,
    pub end_progress: Option<f64>,
    pub direction: Option<TransitionDirection>,
    pub fade_color: Option<Color>,
    pub hor_repeat: Option<i32>,
    pub vert_repeat: Option<i32>,
    pub border_width: Option<i32>,
    pub border_color: Option<Color>,
}

impl Transition {
    pub fn new(transition_type: TransitionType) -> Self {
        Transition {
            transition_type: Some(transition_type),
            ..Self::default()
        }
    }
}

impl Markup for Transition {
    fn attributes(&self, attrs: &mut Attributes<'_>) {
        attrs.value("type", self.transition_type);
        attrs.text("subtype", self.subtype.as_deref());
        attrs.value("dur", self.dur);
        attrs.value("startProgress", self.start_progress.map(format_number));
        attrs.value("endProgress", self.end_progress.map(format_number));
        attrs.value("direction", self.direction);
        attrs.value("fadeColor", self.fade_color);
        attrs.value("horRepeat", self.hor_repeat);
        attrs.value("vertRepeat", self.vert_repeat);
        attrs.value("borderWidth", self.border_width);
        attrs.value("borderColor", self.border_color);
    }
}
