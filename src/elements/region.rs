use super::{ElementTag, Markup};
use crate::list::{Container, ElementList, IdentifiableElementList};
use crate::registry::ElementId;
use crate::values::RelativeValue;
use crate::writer::Attributes;

/// A `<regionBase>`: the screen layout for one device.
#[derive(Debug, Default)]
pub struct RegionBase {
    pub device: Option<String>,
    imports: ElementList,
    regions: IdentifiableElementList,
}

impl RegionBase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn imports(&self) -> &ElementList {
        &self.imports
    }

    pub fn regions(&self) -> &IdentifiableElementList {
        &self.regions
    }
}

impl Markup for RegionBase {
    fn attributes(&self, attrs: &mut Attributes<'_>) {
        attrs.text("device", self.device.as_deref());
    }

    fn children(&self) -> Vec<ElementId> {
        self.imports
            .iter()
            .chain(self.regions.iter())
            .copied()
            .collect()
    }

    fn container(&mut self, child: ElementTag) -> Option<Container<'_>> {
        match child {
            ElementTag::ImportBase => Some(Container::List(&mut self.imports)),
            ElementTag::Region => Some(Container::Identified(&mut self.regions)),
            _ => None,
        }
    }
}

/// A `<region>`: a rectangle of the screen, possibly nested.
///
/// Coordinates are relative (percent of the parent region) or absolute.
#[derive(Debug, Default)]
pub struct Region {
    pub left: Option<RelativeValue>,
    pub right: Option<RelativeValue>,
    pub top: Option<RelativeValue>,
    pub bottom: Option<RelativeValue>,
    pub height: Option<RelativeValue>,
    pub width: Option<RelativeValue>,
    pub z_index: Option<i32>,
    pub title: Option<String>,
    regions: IdentifiableElementList,
}

impl Region {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn regions(&self) -> &IdentifiableElementList {
        &self.regions
    }

    /// The coordinates that are set, paired with their attribute names.
    pub fn coordinates(&self) -> Vec<(&'static str, RelativeValue)> {
        [
            ("left", self.left),
            ("right", self.right),
            ("top", self.top),
            ("bottom", self.bottom),
            ("height", self.height),
            ("width", self.width),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.map(|v| (name, v)))
        .collect()
    }
}

impl Markup for Region {
    fn attributes(&self, attrs: &mut Attributes<'_>) {
        for (name, value) in self.coordinates() {
            attrs.value(name, Some(value));
        }
        attrs.value("zIndex", self.z_index);
        attrs.text("title", self.title.as_deref());
    }

    fn children(&self) -> Vec<ElementId> {
        self.regions.iter().copied().collect()
    }

    fn container(&mut self, child: ElementTag) -> Option<Container<'_>> {
        match child {
            ElementTag::Region => Some(Container::Identified(&mut self.regions)),
            _ => None,
        }
    }
}
