use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::document::NclDocument;
use crate::elements::{
    Bind, CausalConnector, Descriptor, Element, Identity, Link, Media, Port, Region, Rule,
    Transition,
};
use crate::reference::{Reference, Target};
use crate::registry::ElementId;
use crate::values::RelativeValue;

const MIN_LINK_BINDS: usize = 2;
const MAX_PERCENT: f64 = 100.0;

/// A finding attached to one element.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub element: ElementId,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.element, self.message)
    }
}

/// Everything `validate` found, in document order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Report {
    pub warnings: Vec<Diagnostic>,
    pub errors: Vec<Diagnostic>,
}

impl Report {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, element: ElementId, message: String) {
        self.errors.push(Diagnostic { element, message });
    }

    fn warning(&mut self, element: ElementId, message: String) {
        self.warnings.push(Diagnostic { element, message });
    }
}

/// Check the subtree rooted at `scope`. Never fails.
pub fn validate(doc: &NclDocument, scope: ElementId) -> Report {
    let mut report = Report::default();
    let elements = doc.descendants(scope);
    validate_ids(doc, &elements, &mut report);

    for element in elements {
        let Some(payload) = doc.element(element) else {
            continue;
        };
        match payload {
            Element::Region(region) => validate_region(region, element, &mut report),
            Element::Descriptor(descriptor) => {
                validate_descriptor(doc, descriptor, element, &mut report)
            }
            Element::Transition(transition) => {
                validate_transition(transition, element, &mut report)
            }
            Element::Rule(rule) => validate_rule(doc, rule, element, &mut report),
            Element::Media(media) => validate_media(doc, media, element, &mut report),
            Element::Port(port) => validate_port(doc, port, element, &mut report),
            Element::Link(link) => validate_link(doc, link, element, &mut report),
            Element::Bind(bind) => validate_bind(doc, bind, element, &mut report),
            Element::ImportNcl(_) | Element::ImportBase(_) => {
                if doc.imported_document(element).is_none() {
                    report.error(
                        element,
                        format!(
                            "import '{}' has no loaded document",
                            doc.alias_name(element).unwrap_or_default()
                        ),
                    );
                }
            }
            _ => {}
        }
    }
    report
}

/// Required ids are present and no id repeats within one document.
fn validate_ids(doc: &NclDocument, elements: &[ElementId], report: &mut Report) {
    let mut seen: HashMap<(Option<ElementId>, &str), ElementId> = HashMap::new();
    for &element in elements {
        let Some(tag) = doc.tag(element) else {
            continue;
        };
        let Some(id) = doc.id(element) else {
            if tag.identity() == Identity::Required {
                report.error(element, format!("<{}> requires an id", tag));
            }
            continue;
        };
        match seen.get(&(doc.document_of(element), id)) {
            Some(first) => report.error(
                element,
                format!("duplicate id '{}' (first used by {})", id, first),
            ),
            None => {
                seen.insert((doc.document_of(element), id), element);
            }
        }
    }
}

fn validate_reference<K: Target>(
    doc: &NclDocument,
    owner: ElementId,
    attribute: &str,
    reference: Option<&Reference<K>>,
    report: &mut Report,
) {
    let Some(reference) = reference else {
        return;
    };
    if let Err(err) = reference.resolve(doc) {
        report.error(owner, format!("'{}' does not resolve: {}", attribute, err));
        return;
    }

    let target_document = doc.document_of(reference.target());
    match reference.alias() {
        None => {
            let owner_document = doc.document_of(owner);
            if owner_document.is_some() && target_document != owner_document {
                report.error(
                    owner,
                    format!(
                        "'{}' points into another document without an import alias",
                        attribute
                    ),
                );
            }
        }
        Some(alias) => {
            if let Some(imported) = doc.imported_document(alias) {
                if target_document != Some(imported) {
                    report.error(
                        owner,
                        format!(
                            "'{}' target is not part of the document imported as '{}'",
                            attribute,
                            doc.alias_name(alias).unwrap_or_default()
                        ),
                    );
                }
            }
        }
    }
}

fn validate_relative(value: RelativeValue, name: &str) -> Option<String> {
    if value.relative && !(0.0..=MAX_PERCENT).contains(&value.value) {
        return Some(format!("{} {}% is outside 0-100%", name, value.value));
    }
    None
}

fn validate_fraction(value: Option<f64>, name: &str) -> Option<String> {
    let value = value?;
    if !(0.0..=1.0).contains(&value) {
        return Some(format!("{} {} is outside 0-1", name, value));
    }
    None
}

fn validate_region(region: &Region, element: ElementId, report: &mut Report) {
    for (name, value) in region.coordinates() {
        if let Some(message) = validate_relative(value, name) {
            report.warning(element, message);
        }
    }
}

fn validate_descriptor(
    doc: &NclDocument,
    descriptor: &Descriptor,
    element: ElementId,
    report: &mut Report,
) {
    if descriptor.region.is_none() {
        report.warning(element, "descriptor has no region".to_string());
    }
    validate_reference(doc, element, "region", descriptor.region.as_ref(), report);
    validate_reference(doc, element, "moveLeft", descriptor.move_left.as_ref(), report);
    validate_reference(doc, element, "moveRight", descriptor.move_right.as_ref(), report);
    validate_reference(doc, element, "moveDown", descriptor.move_down.as_ref(), report);
    validate_reference(doc, element, "moveUp", descriptor.move_up.as_ref(), report);
    if let Some(message) = validate_fraction(
        descriptor.focus_border_transparency,
        "focusBorderTransparency",
    ) {
        report.warning(element, message);
    }
}

fn validate_transition(transition: &Transition, element: ElementId, report: &mut Report) {
    if transition.transition_type.is_none() {
        report.error(element, "transition requires a type".to_string());
    }
    for (name, value) in [
        ("startProgress", transition.start_progress),
        ("endProgress", transition.end_progress),
    ] {
        if let Some(message) = validate_fraction(value, name) {
            report.warning(element, message);
        }
    }
}

fn validate_rule(doc: &NclDocument, rule: &Rule, element: ElementId, report: &mut Report) {
    if rule.var.is_none() {
        report.error(element, "rule requires a var".to_string());
    }
    if rule.value.is_none() {
        report.error(element, "rule requires a value".to_string());
    }
    validate_reference(doc, element, "var", rule.var.as_ref(), report);
}

fn validate_media(doc: &NclDocument, media: &Media, element: ElementId, report: &mut Report) {
    if media.src.is_none() && media.refer.is_none() {
        report.warning(element, "media has neither src nor refer".to_string());
    }
    validate_reference(doc, element, "descriptor", media.descriptor.as_ref(), report);
    validate_reference(doc, element, "refer", media.refer.as_ref(), report);
}

fn validate_port(doc: &NclDocument, port: &Port, element: ElementId, report: &mut Report) {
    if port.component.is_none() {
        report.error(element, "port requires a component".to_string());
    }
    validate_reference(doc, element, "component", port.component.as_ref(), report);
    validate_reference(doc, element, "interface", port.interface.as_ref(), report);
}

fn validate_link(doc: &NclDocument, link: &Link, element: ElementId, report: &mut Report) {
    let Some(xconnector) = link.xconnector.as_ref() else {
        report.error(element, "link requires an xconnector".to_string());
        return;
    };
    validate_reference(doc, element, "xconnector", Some(xconnector), report);
    if link.binds().len() < MIN_LINK_BINDS {
        report.error(
            element,
            format!("link needs at least {} binds", MIN_LINK_BINDS),
        );
    }

    if !xconnector.is_attached(doc) || doc.get::<CausalConnector>(xconnector.target()).is_none() {
        return;
    }
    let roles = connector_roles(doc, xconnector.target());
    for &bind in link.binds() {
        let Some(payload) = doc.get::<Bind>(bind) else {
            continue;
        };
        if !roles.contains(payload.role.as_str()) {
            report.error(
                bind,
                format!("role '{}' is not declared by the connector", payload.role),
            );
        }
    }
}

fn validate_bind(doc: &NclDocument, bind: &Bind, element: ElementId, report: &mut Report) {
    if bind.component.is_none() {
        report.error(element, "bind requires a component".to_string());
    }
    validate_reference(doc, element, "component", bind.component.as_ref(), report);
    validate_reference(doc, element, "interface", bind.interface.as_ref(), report);
    validate_reference(doc, element, "descriptor", bind.descriptor.as_ref(), report);
}

/// Roles declared by the simple conditions and actions of a connector.
fn connector_roles(doc: &NclDocument, connector: ElementId) -> HashSet<&str> {
    doc.descendants(connector)
        .into_iter()
        .filter_map(|e| match doc.element(e)? {
            Element::SimpleCondition(condition) => Some(condition.role.as_str()),
            Element::SimpleAction(action) => Some(action.role.as_str()),
            _ => None,
        })
        .collect()
}
