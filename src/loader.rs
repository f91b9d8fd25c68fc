//! Load NCL text into an [`NclDocument`].
//!
//! The text is parsed into a DOM first; the walk then creates every element
//! and records the reference attributes it meets. References are resolved
//! once the whole document (and everything it imports) exists, so forward
//! references are fine. `alias#id` values go through the import declaring
//! `alias` into the imported document, which is fetched from a
//! [`DocumentSource`] and loaded into the same arena.

use std::collections::HashMap;
use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use log::debug;
use roxmltree::Node;

use crate::config::LoaderConfig;
use crate::document::NclDocument;
use crate::elements::{
    Area, Bind, BindParam, Body, CausalConnector, CompositeRule, CompoundAction,
    CompoundCondition, ConnectorBase, ConnectorParam, Context, Descriptor, DescriptorBase,
    Element, ElementTag, Head, Identity, ImportBase, ImportNcl, ImportedDocumentBase, Kind, Link,
    LinkParam, Media, Meta, Ncl, Port, Property, Region, RegionBase, Rule, RuleBase,
    SimpleAction, SimpleCondition, Transition, TransitionBase,
};
use crate::error::{NclError, NclResult};
use crate::identifier::split_alias;
use crate::reference::{AnyInterface, Reference, Target, TargetAttribute};
use crate::registry::ElementId;
use crate::values::parse_fraction;

/// Where imported documents come from.
pub trait DocumentSource {
    fn fetch(&self, uri: &str) -> NclResult<String>;
}

/// Reads imported documents relative to a base directory.
#[derive(Debug, Clone)]
pub struct FileSource {
    base_dir: PathBuf,
}

impl FileSource {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        FileSource {
            base_dir: base_dir.into(),
        }
    }
}

impl DocumentSource for FileSource {
    fn fetch(&self, uri: &str) -> NclResult<String> {
        let path = self.base_dir.join(uri);
        std::fs::read_to_string(&path).map_err(|e| NclError::SourceUnavailable {
            uri: uri.to_string(),
            reason: e.to_string(),
        })
    }
}

/// In-memory documents keyed by URI.
impl DocumentSource for HashMap<String, String> {
    fn fetch(&self, uri: &str) -> NclResult<String> {
        self.get(uri)
            .cloned()
            .ok_or_else(|| NclError::SourceUnavailable {
                uri: uri.to_string(),
                reason: "no such document".to_string(),
            })
    }
}

/// Load a self-contained document. Imports are kept but not fetched.
pub fn load(xml: &str) -> NclResult<NclDocument> {
    let config = LoaderConfig {
        resolve_imports: false,
        ..LoaderConfig::default()
    };
    Loader::run(xml, &config, None, None)
}

/// Load a document, fetching its imports from `source`.
pub fn load_with(
    xml: &str,
    config: &LoaderConfig,
    source: &dyn DocumentSource,
) -> NclResult<NclDocument> {
    Loader::run(xml, config, Some(source), None)
}

/// Load a file; imports resolve relative to its directory.
pub fn load_file(path: &Path, config: &LoaderConfig) -> NclResult<NclDocument> {
    let text = std::fs::read_to_string(path).map_err(|e| NclError::SourceUnavailable {
        uri: path.display().to_string(),
        reason: e.to_string(),
    })?;
    let base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
    let source = FileSource::new(base_dir);
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned());
    Loader::run(&text, config, Some(&source), name)
}

/// Where an element sits while it is being built.
#[derive(Debug, Clone, Copy)]
struct Scope {
    /// The `<ncl>` root of the document being built.
    document: ElementId,
    /// The innermost `<body>` or `<context>`; components resolve here.
    composition: ElementId,
    depth: usize,
}

/// A reference attribute waiting for the whole graph to exist.
#[derive(Debug)]
struct Fixup {
    owner: ElementId,
    scope: Scope,
    attribute: &'static str,
    value: String,
}

struct Loader<'a> {
    doc: NclDocument,
    config: &'a LoaderConfig,
    source: Option<&'a dyn DocumentSource>,
    fixups: Vec<Fixup>,
    in_progress: Vec<String>,
    loaded: HashMap<String, ElementId>,
}

impl<'a> Loader<'a> {
    fn run(
        xml: &str,
        config: &'a LoaderConfig,
        source: Option<&'a dyn DocumentSource>,
        uri: Option<String>,
    ) -> NclResult<NclDocument> {
        let dom = roxmltree::Document::parse(xml)?;
        let ncl = ncl_element(&dom)?;
        let mut loader = Loader {
            doc: NclDocument::new(required(ncl, "id")?)?,
            config,
            source,
            fixups: Vec::new(),
            in_progress: uri.into_iter().collect(),
            loaded: HashMap::new(),
        };

        let root = loader.doc.root();
        debug!("loading document '{}'", loader.doc.id(root).unwrap_or_default());
        loader.build_document(ncl, root, 0)?;

        let fixups = std::mem::take(&mut loader.fixups);
        debug!("resolving {} deferred references", fixups.len());
        for fixup in &fixups {
            loader.apply(fixup)?;
        }
        Ok(loader.doc)
    }

    fn build_document(&mut self, ncl: Node, root: ElementId, depth: usize) -> NclResult<()> {
        let title = ncl.attribute("title").map(str::to_string);
        let xmlns = ncl.tag_name().namespace().map(str::to_string);
        if let Some(payload) = self.doc.get_mut::<Ncl>(root) {
            payload.title = title;
            payload.xmlns = xmlns;
        }
        let scope = Scope {
            document: root,
            composition: root,
            depth,
        };
        self.build_children(ncl, root, scope)
    }

    fn build_children(&mut self, node: Node, owner: ElementId, scope: Scope) -> NclResult<()> {
        for child in element_children(node) {
            let element = self.build_element(child, scope)?;
            let appended = match self.doc.append(owner, element) {
                Err(NclError::InvalidChild { .. }) => false,
                other => other?,
            };
            if !appended {
                return Err(match child.attribute("id") {
                    Some(id)
                        if self
                            .doc
                            .children(owner)
                            .iter()
                            .any(|c| *c != element && self.doc.id(*c) == Some(id)) =>
                    {
                        NclError::InvalidAttribute {
                            tag: tag_name(child),
                            attribute: "id".to_string(),
                            value: id.to_string(),
                            reason: "duplicate id".to_string(),
                        }
                    }
                    _ => NclError::UnexpectedElement {
                        tag: tag_name(child),
                        parent: tag_name(node),
                    },
                });
            }
        }
        Ok(())
    }

    fn build_element(&mut self, node: Node, scope: Scope) -> NclResult<ElementId> {
        let tag = ElementTag::from_name(node.tag_name().name()).ok_or_else(|| {
            NclError::UnexpectedElement {
                tag: tag_name(node),
                parent: node.parent_element().map(tag_name).unwrap_or_default(),
            }
        })?;

        let element = match tag {
            ElementTag::Ncl => {
                return Err(NclError::UnexpectedElement {
                    tag: tag_name(node),
                    parent: node.parent_element().map(tag_name).unwrap_or_default(),
                })
            }
            ElementTag::Head => self.add(node, Head::new())?,
            ElementTag::Body => self.add(node, Body::new())?,
            ElementTag::Meta => self.add(
                node,
                Meta::new(required(node, "name")?, required(node, "content")?),
            )?,
            ElementTag::RegionBase => {
                let mut base = RegionBase::new();
                base.device = text(node, "device");
                self.add(node, base)?
            }
            ElementTag::Region => self.add(node, parse_region(node)?)?,
            ElementTag::DescriptorBase => self.add(node, DescriptorBase::new())?,
            ElementTag::Descriptor => self.add(node, parse_descriptor(node)?)?,
            ElementTag::TransitionBase => self.add(node, TransitionBase::new())?,
            ElementTag::Transition => self.add(node, parse_transition(node)?)?,
            ElementTag::RuleBase => self.add(node, RuleBase::new())?,
            ElementTag::Rule => {
                let rule = Rule {
                    var: None,
                    comparator: optional(node, "comparator")?,
                    value: text(node, "value"),
                };
                self.add(node, rule)?
            }
            ElementTag::CompositeRule => {
                let mut rule = CompositeRule::default();
                rule.operator = optional(node, "operator")?;
                self.add(node, rule)?
            }
            ElementTag::ConnectorBase => self.add(node, ConnectorBase::new())?,
            ElementTag::CausalConnector => self.add(node, CausalConnector::new())?,
            ElementTag::ConnectorParam => {
                let mut param = ConnectorParam::new(required(node, "name")?);
                param.param_type = text(node, "type");
                self.add(node, param)?
            }
            ElementTag::SimpleCondition => self.add(node, parse_simple_condition(node)?)?,
            ElementTag::CompoundCondition => {
                let mut condition = CompoundCondition::default();
                condition.operator = optional(node, "operator")?;
                condition.delay = optional(node, "delay")?;
                self.add(node, condition)?
            }
            ElementTag::SimpleAction => self.add(node, parse_simple_action(node)?)?,
            ElementTag::CompoundAction => {
                let mut action = CompoundAction::default();
                action.operator = optional(node, "operator")?;
                action.delay = optional(node, "delay")?;
                self.add(node, action)?
            }
            ElementTag::ImportedDocumentBase => self.add(node, ImportedDocumentBase::new())?,
            ElementTag::ImportNcl => self.add(
                node,
                ImportNcl::new(required(node, "alias")?, required(node, "documentURI")?)?,
            )?,
            ElementTag::ImportBase => {
                let mut import =
                    ImportBase::new(required(node, "alias")?, required(node, "documentURI")?)?;
                import.base_id = text(node, "baseId");
                self.add(node, import)?
            }
            ElementTag::Media => {
                let mut media = Media::new();
                media.src = text(node, "src");
                media.media_type = text(node, "type");
                media.instance = text(node, "instance");
                self.add(node, media)?
            }
            ElementTag::Context => self.add(node, Context::new())?,
            ElementTag::Port => self.add(node, Port::new())?,
            ElementTag::Area => self.add(node, parse_area(node))?,
            ElementTag::Property => {
                let mut property = Property::new(required(node, "name")?);
                property.value = text(node, "value");
                self.add(node, property)?
            }
            ElementTag::Link => self.add(node, Link::new())?,
            ElementTag::LinkParam => self.add(
                node,
                LinkParam::new(required(node, "name")?, required(node, "value")?),
            )?,
            ElementTag::Bind => self.add(node, Bind::new(required(node, "role")?))?,
            ElementTag::BindParam => self.add(
                node,
                BindParam::new(required(node, "name")?, required(node, "value")?),
            )?,
        };

        self.defer(node, tag, element, scope);
        if tag.is_alias() {
            self.resolve_import(element, scope)?;
        }

        let inner = match tag {
            ElementTag::Body | ElementTag::Context => Scope {
                composition: element,
                ..scope
            },
            _ => scope,
        };
        self.build_children(node, element, inner)?;
        Ok(element)
    }

    /// Store a payload, with the node's id when the kind carries one.
    fn add<K: Kind>(&mut self, node: Node, payload: K) -> NclResult<ElementId> {
        match K::TAG.identity() {
            Identity::Required => {
                let id = required(node, "id")?;
                self.doc.create(id, payload)
            }
            Identity::Optional => match node.attribute("id") {
                Some(id) => self.doc.create(id, payload),
                None => self.doc.insert(payload),
            },
            Identity::Never => self.doc.insert(payload),
        }
    }

    fn defer(&mut self, node: Node, tag: ElementTag, owner: ElementId, scope: Scope) {
        let attributes: &[&'static str] = match tag {
            ElementTag::Media => &["descriptor", "refer"],
            ElementTag::Port => &["component", "interface"],
            ElementTag::Descriptor => &["region", "moveLeft", "moveRight", "moveDown", "moveUp"],
            ElementTag::Rule => &["var"],
            ElementTag::Link => &["xconnector"],
            ElementTag::Bind => &["component", "interface", "descriptor"],
            _ => &[],
        };
        for &attribute in attributes {
            if let Some(value) = node.attribute(attribute) {
                self.fixups.push(Fixup {
                    owner,
                    scope,
                    attribute,
                    value: value.trim().to_string(),
                });
            }
        }
    }

    fn resolve_import(&mut self, import: ElementId, scope: Scope) -> NclResult<()> {
        if !self.config.resolve_imports {
            return Ok(());
        }
        let Some(source) = self.source else {
            return Ok(());
        };
        let uri = match self.doc.element(import) {
            Some(Element::ImportNcl(payload)) => payload.document_uri.clone(),
            Some(Element::ImportBase(payload)) => payload.document_uri.clone(),
            _ => return Err(NclError::UnknownElement(import)),
        };

        let root = match self.loaded.get(&uri) {
            Some(root) => *root,
            None => self.load_import(source, &uri, scope.depth + 1)?,
        };
        self.doc.attach_import_document(import, root)
    }

    fn load_import(
        &mut self,
        source: &dyn DocumentSource,
        uri: &str,
        depth: usize,
    ) -> NclResult<ElementId> {
        if self.in_progress.iter().any(|current| current == uri) {
            return Err(NclError::CircularImport {
                uri: uri.to_string(),
            });
        }
        if depth > self.config.max_import_depth {
            return Err(NclError::ImportDepthExceeded {
                max_depth: self.config.max_import_depth,
            });
        }

        let text = source.fetch(uri)?;
        let dom = roxmltree::Document::parse(&text)?;
        let ncl = ncl_element(&dom)?;
        let root = self.doc.add_document(required(ncl, "id")?)?;

        self.in_progress.push(uri.to_string());
        self.build_document(ncl, root, depth)?;
        self.in_progress.pop();

        self.loaded.insert(uri.to_string(), root);
        debug!("loaded import '{}' as document {}", uri, root);
        Ok(root)
    }

    fn apply(&mut self, fixup: &Fixup) -> NclResult<()> {
        let owner = fixup.owner;
        let tag = self.doc.tag(owner).ok_or(NclError::UnknownElement(owner))?;
        let document = fixup.scope.document;
        let composition = fixup.scope.composition;

        match (tag, fixup.attribute) {
            (ElementTag::Media, "descriptor") => {
                let reference = self.resolve(fixup, document, TargetAttribute::Id)?;
                self.payload::<Media>(owner)?.descriptor = Some(reference);
            }
            (ElementTag::Media, "refer") => {
                let reference = self.resolve(fixup, document, TargetAttribute::Id)?;
                self.payload::<Media>(owner)?.refer = Some(reference);
            }
            (ElementTag::Port, "component") => {
                let reference = self.resolve(fixup, composition, TargetAttribute::Id)?;
                self.payload::<Port>(owner)?.component = Some(reference);
            }
            (ElementTag::Port, "interface") => {
                let component = self
                    .doc
                    .get::<Port>(owner)
                    .and_then(|p| p.component.as_ref())
                    .map(Reference::target);
                let reference = self.resolve_interface(fixup, component)?;
                self.payload::<Port>(owner)?.interface = Some(reference);
            }
            (ElementTag::Descriptor, "region") => {
                let reference = self.resolve(fixup, document, TargetAttribute::Id)?;
                self.payload::<Descriptor>(owner)?.region = Some(reference);
            }
            (ElementTag::Descriptor, direction) => {
                let reference = self.resolve(fixup, document, TargetAttribute::FocusIndex)?;
                let descriptor = self.payload::<Descriptor>(owner)?;
                let slot = match direction {
                    "moveLeft" => &mut descriptor.move_left,
                    "moveRight" => &mut descriptor.move_right,
                    "moveDown" => &mut descriptor.move_down,
                    _ => &mut descriptor.move_up,
                };
                *slot = Some(reference);
            }
            (ElementTag::Rule, _) => {
                let reference = self.resolve(fixup, document, TargetAttribute::Name)?;
                self.payload::<Rule>(owner)?.var = Some(reference);
            }
            (ElementTag::Link, _) => {
                let reference = self.resolve(fixup, document, TargetAttribute::Id)?;
                self.payload::<Link>(owner)?.xconnector = Some(reference);
            }
            (ElementTag::Bind, "component") => {
                let reference = self.resolve(fixup, composition, TargetAttribute::Id)?;
                self.payload::<Bind>(owner)?.component = Some(reference);
            }
            (ElementTag::Bind, "interface") => {
                let component = self
                    .doc
                    .get::<Bind>(owner)
                    .and_then(|b| b.component.as_ref())
                    .map(Reference::target);
                let reference = self.resolve_interface(fixup, component)?;
                self.payload::<Bind>(owner)?.interface = Some(reference);
            }
            (ElementTag::Bind, _) => {
                let reference = self.resolve(fixup, document, TargetAttribute::Id)?;
                self.payload::<Bind>(owner)?.descriptor = Some(reference);
            }
            _ => {}
        }
        Ok(())
    }

    fn payload<K: Kind>(&mut self, owner: ElementId) -> NclResult<&mut K> {
        self.doc
            .get_mut::<K>(owner)
            .ok_or(NclError::UnknownElement(owner))
    }

    /// Resolve `fixup.value`, possibly `alias#value`, against `scope`.
    fn resolve<K: Target>(
        &mut self,
        fixup: &Fixup,
        scope: ElementId,
        attribute: TargetAttribute,
    ) -> NclResult<Reference<K>> {
        let (alias, value) = split_alias(&fixup.value);
        let Some(alias) = alias else {
            let target = self.lookup::<K>(fixup, scope, value, attribute)?;
            return self.doc.reference(target, attribute);
        };

        let import = self
            .doc
            .find_import(fixup.scope.document, alias)
            .ok_or_else(|| NclError::UnknownAlias {
                alias: alias.to_string(),
            })?;
        let imported =
            self.doc
                .imported_document(import)
                .ok_or_else(|| NclError::UnresolvedImport {
                    alias: alias.to_string(),
                })?;
        let scope = self.import_scope(fixup, import, imported)?;
        let target = self.lookup::<K>(fixup, scope, value, attribute)?;
        self.doc.aliased_reference(import, target, attribute)
    }

    /// The imported document, or the base named by an `importBase`'s `baseId`.
    fn import_scope(
        &self,
        fixup: &Fixup,
        import: ElementId,
        imported: ElementId,
    ) -> NclResult<ElementId> {
        let Some(base_id) = self
            .doc
            .get::<ImportBase>(import)
            .and_then(|i| i.base_id.as_deref())
        else {
            return Ok(imported);
        };
        self.doc
            .find(imported, base_id)?
            .ok_or_else(|| NclError::UnknownReference {
                tag: tag_of(&self.doc, fixup.owner),
                value: format!("{} (baseId of '{}')", fixup.value, base_id),
            })
    }

    /// An interface is an area or port id, or a property name, inside the
    /// component.
    fn resolve_interface(
        &mut self,
        fixup: &Fixup,
        component: Option<ElementId>,
    ) -> NclResult<Reference<AnyInterface>> {
        let component = component.ok_or_else(|| NclError::MissingAttribute {
            tag: tag_of(&self.doc, fixup.owner),
            attribute: "component".to_string(),
        })?;
        match self.doc.find_kind::<AnyInterface>(component, &fixup.value)? {
            Some(target) => self.doc.reference(target, TargetAttribute::Id),
            None => {
                let target = self.lookup::<AnyInterface>(
                    fixup,
                    component,
                    &fixup.value,
                    TargetAttribute::Name,
                )?;
                self.doc.reference(target, TargetAttribute::Name)
            }
        }
    }

    fn lookup<K: Target>(
        &self,
        fixup: &Fixup,
        scope: ElementId,
        value: &str,
        attribute: TargetAttribute,
    ) -> NclResult<ElementId> {
        let doc = &self.doc;
        let found = match attribute {
            TargetAttribute::Id => doc.find_kind::<K>(scope, value)?,
            TargetAttribute::Name => doc.descendants(scope).into_iter().find(|e| {
                doc.get::<Property>(*e).is_some_and(|p| p.name == value)
                    && doc.tag(*e).is_some_and(K::accepts)
            }),
            TargetAttribute::FocusIndex => {
                let index: i32 = parse_value(value, &tag_of(doc, fixup.owner), fixup.attribute)?;
                doc.descendants(scope).into_iter().find(|e| {
                    doc.get::<Descriptor>(*e)
                        .is_some_and(|d| d.focus_index == Some(index))
                        && doc.tag(*e).is_some_and(K::accepts)
                })
            }
        };
        found.ok_or_else(|| NclError::UnknownReference {
            tag: tag_of(doc, fixup.owner),
            value: fixup.value.clone(),
        })
    }
}

fn tag_of(doc: &NclDocument, element: ElementId) -> String {
    doc.tag(element).map(|t| t.to_string()).unwrap_or_default()
}

// ─── DOM helpers ─────────────────────────────────────────────────────────────

fn ncl_element<'a, 'input>(dom: &'a roxmltree::Document<'input>) -> NclResult<Node<'a, 'input>> {
    let root = dom.root_element();
    if root.tag_name().name() != ElementTag::Ncl.name() {
        return Err(NclError::UnexpectedElement {
            tag: tag_name(root),
            parent: "document".to_string(),
        });
    }
    Ok(root)
}

/// Iterator over element children (skips text and comments).
fn element_children<'a, 'input>(
    node: Node<'a, 'input>,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children().filter(|n| n.is_element())
}

fn tag_name(node: Node) -> String {
    node.tag_name().name().to_string()
}

fn text(node: Node, attribute: &str) -> Option<String> {
    node.attribute(attribute).map(str::to_string)
}

fn required<'a>(node: Node<'a, '_>, attribute: &str) -> NclResult<&'a str> {
    node.attribute(attribute)
        .ok_or_else(|| NclError::MissingAttribute {
            tag: tag_name(node),
            attribute: attribute.to_string(),
        })
}

fn parse_value<T>(value: &str, tag: &str, attribute: &str) -> NclResult<T>
where
    T: FromStr,
    T::Err: Display,
{
    value
        .trim()
        .parse::<T>()
        .map_err(|e| NclError::InvalidAttribute {
            tag: tag.to_string(),
            attribute: attribute.to_string(),
            value: value.to_string(),
            reason: e.to_string(),
        })
}

fn optional<T>(node: Node, attribute: &str) -> NclResult<Option<T>>
where
    T: FromStr,
    T::Err: Display,
{
    node.attribute(attribute)
        .map(|value| parse_value(value, &tag_name(node), attribute))
        .transpose()
}

fn optional_fraction(node: Node, attribute: &str) -> NclResult<Option<f64>> {
    node.attribute(attribute)
        .map(|value| {
            parse_fraction(value).map_err(|reason| NclError::InvalidAttribute {
                tag: tag_name(node),
                attribute: attribute.to_string(),
                value: value.to_string(),
                reason,
            })
        })
        .transpose()
}

// ─── Per-kind attribute parsing ──────────────────────────────────────────────

fn parse_region(node: Node) -> NclResult<Region> {
    let mut region = Region::new();
    region.left = optional(node, "left")?;
    region.right = optional(node, "right")?;
    region.top = optional(node, "top")?;
    region.bottom = optional(node, "bottom")?;
    region.height = optional(node, "height")?;
    region.width = optional(node, "width")?;
    region.z_index = optional(node, "zIndex")?;
    region.title = text(node, "title");
    Ok(region)
}

fn parse_descriptor(node: Node) -> NclResult<Descriptor> {
    let mut descriptor = Descriptor::new();
    descriptor.explicit_dur = optional(node, "explicitDur")?;
    descriptor.freeze = optional(node, "freeze")?;
    descriptor.player = text(node, "player");
    descriptor.focus_index = optional(node, "focusIndex")?;
    descriptor.focus_border_color = optional(node, "focusBorderColor")?;
    descriptor.focus_border_width = optional(node, "focusBorderWidth")?;
    descriptor.focus_border_transparency = optional_fraction(node, "focusBorderTransparency")?;
    descriptor.focus_src = text(node, "focusSrc");
    descriptor.focus_sel_src = text(node, "focusSelSrc");
    descriptor.sel_border_color = optional(node, "focusSelBorderColor")?;
    Ok(descriptor)
}

fn parse_transition(node: Node) -> NclResult<Transition> {
    Ok(Transition {
        transition_type: optional(node, "type")?,
        subtype: text(node, "subtype"),
        dur: optional(node, "dur")?,
        start_progress: optional_fraction(node, "startProgress")?,
        end_progress: optional_fraction(node, "endProgress")?,
        direction: optional(node, "direction")?,
        fade_color: optional(node, "fadeColor")?,
        hor_repeat: optional(node, "horRepeat")?,
        vert_repeat: optional(node, "vertRepeat")?,
        border_width: optional(node, "borderWidth")?,
        border_color: optional(node, "borderColor")?,
    })
}

fn parse_simple_condition(node: Node) -> NclResult<SimpleCondition> {
    let mut condition = SimpleCondition::new(required(node, "role")?);
    condition.delay = optional(node, "delay")?;
    condition.event_type = optional(node, "eventType")?;
    condition.key = text(node, "key");
    condition.transition = optional(node, "transition")?;
    condition.min = optional(node, "min")?;
    condition.max = text(node, "max");
    condition.qualifier = optional(node, "qualifier")?;
    Ok(condition)
}

fn parse_simple_action(node: Node) -> NclResult<SimpleAction> {
    let mut action = SimpleAction::new(required(node, "role")?);
    action.delay = optional(node, "delay")?;
    action.event_type = optional(node, "eventType")?;
    action.action_type = optional(node, "actionType")?;
    action.value = text(node, "value");
    action.min = optional(node, "min")?;
    action.max = text(node, "max");
    action.qualifier = optional(node, "qualifier")?;
    action.repeat = optional(node, "repeat")?;
    action.repeat_delay = optional(node, "repeatDelay")?;
    action.duration = optional(node, "duration")?;
    action.by = text(node, "by");
    Ok(action)
}

fn parse_area(node: Node) -> Area {
    Area {
        coords: text(node, "coords"),
        begin: text(node, "begin"),
        end: text(node, "end"),
        text: text(node, "text"),
        position: text(node, "position"),
        first: text(node, "first"),
        last: text(node, "last"),
        label: text(node, "label"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REGIONS: &str = r#"<ncl id="doc" xmlns="http://www.ncl.org.br/NCL3.0/EDTVProfile">
        <head>
            <regionBase>
                <region id="rgTV" left="10%" width="800">
                    <region id="rg1" top="5%"/>
                </region>
            </regionBase>
            <descriptorBase>
                <descriptor id="d1" region="rg1" focusIndex="1" moveRight="2"/>
                <descriptor id="d2" region="rgTV" focusIndex="2" moveLeft="1"/>
            </descriptorBase>
        </head>
    </ncl>"#;

    #[test]
    fn test_load_regions_and_descriptors() {
        let doc = load(REGIONS).unwrap();
        let rg1 = doc.find(doc.root(), "rg1").unwrap().unwrap();
        let region = doc.get::<Region>(rg1).unwrap();
        assert_eq!(region.top.map(|v| v.relative), Some(true));

        let d1 = doc.find(doc.root(), "d1").unwrap().unwrap();
        let descriptor = doc.get::<Descriptor>(d1).unwrap();
        assert_eq!(descriptor.region.as_ref().unwrap().resolve(&doc).unwrap(), "rg1");
        // moveRight renders the focus index of its target, a forward reference.
        assert_eq!(descriptor.move_right.as_ref().unwrap().resolve(&doc).unwrap(), "2");
    }

    #[test]
    fn test_unknown_reference_fails() {
        let xml = r#"<ncl id="doc"><head><descriptorBase>
            <descriptor id="d1" region="missing"/>
        </descriptorBase></head></ncl>"#;
        assert!(matches!(
            load(xml),
            Err(NclError::UnknownReference { value, .. }) if value == "missing"
        ));
    }

    #[test]
    fn test_missing_required_attribute() {
        let xml = r#"<ncl id="doc"><head><regionBase><region left="1"/></regionBase></head></ncl>"#;
        assert!(matches!(
            load(xml),
            Err(NclError::MissingAttribute { attribute, .. }) if attribute == "id"
        ));
    }

    #[test]
    fn test_unexpected_element() {
        let xml = r#"<ncl id="doc"><body><region id="r"/></body></ncl>"#;
        assert!(matches!(
            load(xml),
            Err(NclError::UnexpectedElement { tag, parent }) if tag == "region" && parent == "body"
        ));
        assert!(matches!(
            load(r#"<ncl id="doc"><video/></ncl>"#),
            Err(NclError::UnexpectedElement { .. })
        ));
    }

    #[test]
    fn test_bad_attribute_value() {
        let xml = r#"<ncl id="doc"><head><transitionBase>
            <transition id="t" type="spin"/>
        </transitionBase></head></ncl>"#;
        assert!(matches!(
            load(xml),
            Err(NclError::InvalidAttribute { attribute, .. }) if attribute == "type"
        ));
    }

    #[test]
    fn test_circular_import_detected() {
        let mut sources = HashMap::new();
        sources.insert(
            "a.ncl".to_string(),
            r#"<ncl id="a"><head><importedDocumentBase>
                <importNCL alias="b" documentURI="b.ncl"/>
            </importedDocumentBase></head></ncl>"#
                .to_string(),
        );
        sources.insert(
            "b.ncl".to_string(),
            r#"<ncl id="b"><head><importedDocumentBase>
                <importNCL alias="a" documentURI="a.ncl"/>
            </importedDocumentBase></head></ncl>"#
                .to_string(),
        );
        let main = r#"<ncl id="main"><head><importedDocumentBase>
            <importNCL alias="a" documentURI="a.ncl"/>
        </importedDocumentBase></head></ncl>"#;

        let result = load_with(main, &LoaderConfig::default(), &sources);
        assert!(matches!(result, Err(NclError::CircularImport { uri }) if uri == "a.ncl"));
    }

    #[test]
    fn test_import_base_id_scopes_lookup() {
        let mut sources = HashMap::new();
        sources.insert(
            "layout.ncl".to_string(),
            r#"<ncl id="layout"><head>
                <regionBase id="tv"><region id="rgMain"/></regionBase>
                <regionBase id="mobile"><region id="rgSmall"/></regionBase>
            </head></ncl>"#
                .to_string(),
        );
        let main = |region: &str| {
            format!(
                r#"<ncl id="main"><head>
                    <regionBase><importBase alias="lay" documentURI="layout.ncl" baseId="tv"/></regionBase>
                    <descriptorBase><descriptor id="d" region="lay#{}"/></descriptorBase>
                </head></ncl>"#,
                region
            )
        };

        let doc = load_with(&main("rgMain"), &LoaderConfig::default(), &sources).unwrap();
        let d = doc.find(doc.root(), "d").unwrap().unwrap();
        assert_eq!(doc.render(d, 0), "<descriptor id='d' region='lay#rgMain' />\n");

        // rgSmall exists in the imported document, but not in base 'tv'.
        assert!(matches!(
            load_with(&main("rgSmall"), &LoaderConfig::default(), &sources),
            Err(NclError::UnknownReference { .. })
        ));
    }

    #[test]
    fn test_import_depth_limit() {
        let mut sources = HashMap::new();
        sources.insert(
            "leaf.ncl".to_string(),
            r#"<ncl id="leaf"/>"#.to_string(),
        );
        let main = r#"<ncl id="main"><head><importedDocumentBase>
            <importNCL alias="leaf" documentURI="leaf.ncl"/>
        </importedDocumentBase></head></ncl>"#;
        let config = LoaderConfig {
            resolve_imports: true,
            max_import_depth: 0,
        };
        assert!(matches!(
            load_with(main, &config, &sources),
            Err(NclError::ImportDepthExceeded { max_depth: 0 })
        ));
    }
}
