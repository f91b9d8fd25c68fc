use super::{reference_handles, ElementTag, Markup, Region};
use crate::list::{Container, ElementList, IdentifiableElementList};
use crate::reference::Reference;
use crate::registry::{ElementId, RefHandle};
use crate::values::{format_number, Color, Seconds};
use crate::writer::Attributes;

/// A `<descriptorBase>`.
#[derive(Debug, Default)]
pub struct DescriptorBase {
    imports: ElementList,
    descriptors: IdentifiableElementList,
}

impl DescriptorBase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn imports(&self) -> &ElementList {
        &self.imports
    }

    pub fn descriptors(&self) -> &IdentifiableElementList {
        &self.descriptors
    }
}

impl Markup for DescriptorBase {
    fn attributes(&self, _attrs: &mut Attributes<'_>) {}

    fn children(&self) -> Vec<ElementId> {
        self.imports
            .iter()
            .chain(self.descriptors.iter())
            .copied()
            .collect()
    }

    fn container(&mut self, child: ElementTag) -> Option<Container<'_>> {
        match child {
            ElementTag::ImportBase => Some(Container::List(&mut self.imports)),
            ElementTag::Descriptor => Some(Container::Identified(&mut self.descriptors)),
            _ => None,
        }
    }
}

/// A `<descriptor>`: how and where a media is presented.
///
/// The `move*` references point at the descriptor that receives focus when
/// the viewer presses the matching arrow key; they render the target's
/// focus index.
#[derive(Debug, Default)]
pub struct Descriptor {
    pub region: Option<Reference<Region>>,
    pub explicit_dur: Option<Seconds>,
    pub freeze: Option<bool>,
    pub player: Option<String>,
    pub move_left: Option<Reference<Descriptor>>,
    pub move_right: Option<Reference<Descriptor>>,
    pub move_down: Option<Reference<Descriptor>>,
    pub move_up: Option<Reference<Descriptor>>,
    pub focus_index: Option<i32>,
    pub focus_border_color: Option<Color>,
    pub focus_border_width: Option<i32>,
    pub focus_border_transparency: Option<f64>,
    pub focus_src: Option<String>,
    pub focus_sel_src: Option<String>,
    pub sel_border_color: Option<Color>,
}

impl Descriptor {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Markup for Descriptor {
    fn attributes(&self, attrs: &mut Attributes<'_>) {
        attrs.reference("region", self.region.as_ref());
        attrs.value("explicitDur", self.explicit_dur);
        attrs.value("freeze", self.freeze);
        attrs.text("player", self.player.as_deref());
        attrs.reference("moveLeft", self.move_left.as_ref());
        attrs.reference("moveRight", self.move_right.as_ref());
        attrs.reference("moveDown", self.move_down.as_ref());
        attrs.reference("moveUp", self.move_up.as_ref());
        attrs.value("focusIndex", self.focus_index);
        attrs.value("focusBorderColor", self.focus_border_color);
        attrs.value("focusBorderWidth", self.focus_border_width);
        attrs.value(
            "focusBorderTransparency",
            self.focus_border_transparency.map(format_number),
        );
        attrs.text("focusSrc", self.focus_src.as_deref());
        attrs.text("focusSelSrc", self.focus_sel_src.as_deref());
        attrs.value("focusSelBorderColor", self.sel_border_color);
    }

    fn references(&self) -> Vec<RefHandle> {
        reference_handles!(
            self.region,
            self.move_left,
            self.move_right,
            self.move_down,
            self.move_up,
        )
    }
}
