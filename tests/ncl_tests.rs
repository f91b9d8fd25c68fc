use ncl_model::{
    load, load_file, load_with, AnyNode, Descriptor, DescriptorBase, ElementId, ElementTag, Head,
    ImportBase, LoaderConfig, Media, NclDocument, NclError, Region, RegionBase, RelativeValue,
    TargetAttribute, WriterConfig,
};
use pretty_assertions::assert_eq;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

fn get_sample_path(filename: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("samples");
    path.push(filename);
    path
}

fn sample_sources() -> HashMap<String, String> {
    let mut sources = HashMap::new();
    sources.insert(
        "base.ncl".to_string(),
        fs::read_to_string(get_sample_path("base.ncl")).unwrap(),
    );
    sources
}

// --- Rendering ---

#[test]
fn test_nested_regions_render() {
    let mut doc = NclDocument::new("doc").unwrap();
    let mut tv = Region::new();
    tv.left = Some(RelativeValue::percent(10.0));
    let tv = doc.create("rgTV", tv).unwrap();
    let rg1 = doc.create("rg1", Region::new()).unwrap();
    assert!(doc.append(tv, rg1).unwrap());

    let expected = "<region id='rgTV' left='10%'>\n\t<region id='rg1'/>\n</region>\n";
    assert_eq!(doc.render(tv, 0), expected);
    // Negative indents count as zero.
    assert_eq!(doc.render(tv, -4), expected);
    assert_eq!(doc.render(rg1, 2), "\t\t<region id='rg1'/>\n");
}

#[test]
fn test_descriptor_self_closes_with_space() {
    let mut doc = NclDocument::new("doc").unwrap();
    let descriptor = doc.create("dTV", Descriptor::new()).unwrap();
    assert_eq!(doc.render(descriptor, 0), "<descriptor id='dTV' />\n");
}

#[test]
fn test_attribute_values_are_escaped() {
    let mut doc = NclDocument::new("doc").unwrap();
    let media = doc.create("m", Media::with_src("a'b&c<d>.png")).unwrap();
    assert_eq!(
        doc.render(media, 0),
        "<media id='m' src='a&apos;b&amp;c&lt;d&gt;.png'/>\n"
    );
}

#[test]
fn test_to_xml_starts_with_declaration() {
    let doc = NclDocument::new("main").unwrap();
    let xml = doc.to_xml(&WriterConfig::default());
    assert!(xml.starts_with(
        "<?xml version='1.0' encoding='ISO-8859-1'?>\n<!-- Generated with ncl-model -->\n\n<ncl id='main'"
    ));
}

// --- Ownership and identity ---

#[test]
fn test_element_has_single_owner() {
    let mut doc = NclDocument::new("doc").unwrap();
    let first = doc.insert(RegionBase::new()).unwrap();
    let second = doc.insert(RegionBase::new()).unwrap();
    let region = doc.create("r", Region::new()).unwrap();

    assert!(doc.append(first, region).unwrap());
    assert!(matches!(
        doc.append(second, region),
        Err(NclError::AlreadyOwned { parent, .. }) if parent == first
    ));

    assert!(doc.detach(region).unwrap());
    assert!(doc.append(second, region).unwrap());
    assert_eq!(doc.parent(region), Some(second));
}

#[test]
fn test_sibling_ids_are_unique() {
    let mut doc = NclDocument::new("doc").unwrap();
    let base = doc.insert(RegionBase::new()).unwrap();
    let a = doc.create("r", Region::new()).unwrap();
    let b = doc.create("r", Region::new()).unwrap();
    let c = doc.create("other", Region::new()).unwrap();

    assert!(doc.append(base, a).unwrap());
    assert!(!doc.append(base, b).unwrap());
    assert!(doc.append(base, c).unwrap());
    assert!(matches!(
        doc.set_id(c, "r"),
        Err(NclError::InvalidIdentifier { .. })
    ));
    assert_eq!(doc.children(base), vec![a, c]);
}

#[test]
fn test_wrong_child_kind_is_rejected() {
    let mut doc = NclDocument::new("doc").unwrap();
    let base = doc.insert(RegionBase::new()).unwrap();
    let descriptor = doc.create("d", Descriptor::new()).unwrap();
    assert!(matches!(
        doc.append(base, descriptor),
        Err(NclError::InvalidChild {
            parent: ElementTag::RegionBase,
            child: ElementTag::Descriptor
        })
    ));
}

#[test]
fn test_remove_by_id() {
    let mut doc = NclDocument::new("doc").unwrap();
    let base = doc.insert(RegionBase::new()).unwrap();
    let a = doc.create("a", Region::new()).unwrap();
    let b = doc.create("b", Region::new()).unwrap();
    doc.append(base, a).unwrap();
    doc.append(base, b).unwrap();

    assert!(doc.remove_by_id(base, "a").unwrap());
    assert!(!doc.remove_by_id(base, "a").unwrap());
    assert_eq!(doc.children(base), vec![b]);
    assert_eq!(doc.parent(a), None);
}

#[test]
fn test_empty_lookup_id_is_invalid_query() {
    let mut doc = NclDocument::new("doc").unwrap();
    let base = doc.insert(RegionBase::new()).unwrap();
    assert!(matches!(
        doc.find(doc.root(), ""),
        Err(NclError::InvalidQuery { .. })
    ));
    assert!(matches!(
        doc.remove_by_id(base, "   "),
        Err(NclError::InvalidQuery { .. })
    ));
    assert_eq!(doc.find(doc.root(), "missing").unwrap(), None);
}

#[test]
fn test_document_of_follows_attachment() {
    let mut doc = NclDocument::new("doc").unwrap();
    let head = doc.insert(Head::new()).unwrap();
    let base = doc.insert(RegionBase::new()).unwrap();
    let region = doc.create("r", Region::new()).unwrap();

    assert_eq!(doc.document_of(region), None);
    doc.append(base, region).unwrap();
    doc.append(head, base).unwrap();
    // Attached, but the chain does not reach an <ncl> yet.
    assert_eq!(doc.document_of(region), None);

    doc.append(doc.root(), head).unwrap();
    assert_eq!(doc.document_of(region), Some(doc.root()));
    assert_eq!(doc.document_of(doc.root()), Some(doc.root()));

    doc.detach(base).unwrap();
    assert_eq!(doc.document_of(region), None);
}

#[test]
fn test_removed_elements_keep_their_slot() {
    let mut doc = NclDocument::new("doc").unwrap();
    let base = doc.insert(RegionBase::new()).unwrap();
    let region = doc.create("r", Region::new()).unwrap();
    doc.append(base, region).unwrap();
    let len = doc.len();

    doc.remove(base, region).unwrap();
    assert_eq!(doc.len(), len);
    assert_eq!(doc.id(region), Some("r"));
    assert!(doc.append(base, region).unwrap());
}

// --- References ---

#[test]
fn test_reference_construction_errors() {
    let mut doc = NclDocument::new("doc").unwrap();
    let region = doc.create("rg", Region::new()).unwrap();
    let descriptor = doc.create("d", Descriptor::new()).unwrap();
    let base = doc.insert(DescriptorBase::new()).unwrap();

    assert!(matches!(
        doc.reference::<Region>(descriptor, TargetAttribute::Id),
        Err(NclError::TargetMismatch {
            expected: "region",
            found: ElementTag::Descriptor,
        })
    ));
    assert!(matches!(
        doc.aliased_reference::<Region>(base, region, TargetAttribute::Id),
        Err(NclError::NullReference { what: "alias" })
    ));

    // A handle past the end of this document's arena.
    let mut other = NclDocument::new("other").unwrap();
    let mut stranger = other.root();
    for id in ["a", "b", "c", "d", "e"] {
        stranger = other.create(id, Region::new()).unwrap();
    }
    assert!(!doc.contains(stranger));
    assert!(matches!(
        doc.reference::<Region>(stranger, TargetAttribute::Id),
        Err(NclError::NullReference { what: "target" })
    ));
}

#[test]
fn test_unexposed_target_attribute() {
    let mut doc = NclDocument::new("doc").unwrap();
    let region = doc.create("rg", Region::new()).unwrap();
    let media = doc.create("m", Media::new()).unwrap();
    let focused = doc.create("d", Descriptor::new()).unwrap();

    let by_focus = doc.reference::<Region>(region, TargetAttribute::FocusIndex).unwrap();
    assert_eq!(
        by_focus.resolve(&doc),
        Err(NclError::UnresolvedAttribute {
            attribute: TargetAttribute::FocusIndex.as_str(),
            tag: ElementTag::Region,
        })
    );

    let by_name = doc.reference::<AnyNode>(media, TargetAttribute::Name).unwrap();
    assert!(matches!(
        by_name.resolve(&doc),
        Err(NclError::UnresolvedAttribute { tag: ElementTag::Media, .. })
    ));

    // A descriptor without a focus index has nothing to render.
    let unset = doc.reference::<Descriptor>(focused, TargetAttribute::FocusIndex).unwrap();
    assert!(unset.resolve(&doc).is_err());
    doc.modify::<Descriptor, _>(focused, |d| d.focus_index = Some(4)).unwrap();
    assert_eq!(unset.resolve(&doc).unwrap(), "4");
}

#[test]
fn test_moving_an_element_keeps_its_references() {
    let mut doc = NclDocument::new("doc").unwrap();
    let region = doc.create("rg1", Region::new()).unwrap();
    let first = doc.insert(DescriptorBase::new()).unwrap();
    let second = doc.insert(DescriptorBase::new()).unwrap();

    let mut descriptor = Descriptor::new();
    descriptor.region = Some(doc.reference(region, TargetAttribute::Id).unwrap());
    let descriptor = doc.create("d", descriptor).unwrap();
    doc.append(first, descriptor).unwrap();
    let before = doc.render(descriptor, 0);
    assert_eq!(before, "<descriptor id='d' region='rg1' />\n");

    assert!(doc.detach(descriptor).unwrap());
    assert!(doc.append(second, descriptor).unwrap());
    assert_eq!(doc.render(descriptor, 0), before);
}

/// `main` imports `shared` as `lib` and holds an unreferencing descriptor `d`.
fn imported_layout() -> (NclDocument, ImportedLayout) {
    let mut doc = NclDocument::new("main").unwrap();

    // The imported document, held in the same arena.
    let shared = doc.add_document("shared").unwrap();
    let shared_regions = doc.insert(RegionBase::new()).unwrap();
    let screen = doc.create("rgScreen", Region::new()).unwrap();
    doc.append(shared_regions, screen).unwrap();

    let regions = doc.insert(RegionBase::new()).unwrap();
    let import = doc
        .insert(ImportBase::new("lib", "shared.ncl").unwrap())
        .unwrap();
    doc.append(regions, import).unwrap();
    doc.attach_import_document(import, shared).unwrap();

    let descriptors = doc.insert(DescriptorBase::new()).unwrap();
    let descriptor = doc.create("d", Descriptor::new()).unwrap();
    doc.append(descriptors, descriptor).unwrap();

    (
        doc,
        ImportedLayout {
            regions,
            import,
            screen,
            descriptors,
            descriptor,
        },
    )
}

struct ImportedLayout {
    regions: ElementId,
    import: ElementId,
    screen: ElementId,
    descriptors: ElementId,
    descriptor: ElementId,
}

#[test]
fn test_replaced_reference_leaves_alias() {
    let (mut doc, f) = imported_layout();
    for _ in 0..3 {
        let region = doc
            .aliased_reference::<Region>(f.import, f.screen, TargetAttribute::Id)
            .unwrap();
        doc.modify::<Descriptor, _>(f.descriptor, |d| d.region = Some(region))
            .unwrap();
    }
    assert_eq!(doc.referrer_count(f.import), 1);

    doc.modify::<Descriptor, _>(f.descriptor, |d| d.region = None)
        .unwrap();
    assert_eq!(doc.referrer_count(f.import), 0);
}

#[test]
fn test_moved_element_still_follows_its_alias() {
    let (mut doc, f) = imported_layout();
    let region = doc
        .aliased_reference::<Region>(f.import, f.screen, TargetAttribute::Id)
        .unwrap();
    doc.modify::<Descriptor, _>(f.descriptor, |d| d.region = Some(region))
        .unwrap();

    doc.detach(f.descriptor).unwrap();
    assert_eq!(doc.referrer_count(f.import), 0);
    assert_eq!(
        doc.render(f.descriptor, 0),
        "<descriptor id='d' region='lib#rgScreen' />\n"
    );

    doc.append(f.descriptors, f.descriptor).unwrap();
    assert_eq!(doc.referrer_count(f.import), 1);

    // The alias cascade still reaches the moved descriptor.
    doc.remove(f.regions, f.import).unwrap();
    assert_eq!(doc.render(f.descriptor, 0), "<descriptor id='d' />\n");
}

// --- References through imports ---

#[test]
fn test_removing_import_invalidates_references() {
    let mut doc = NclDocument::new("main").unwrap();

    // The imported document, held in the same arena.
    let shared = doc.add_document("shared").unwrap();
    let shared_regions = doc.insert(RegionBase::new()).unwrap();
    let screen = doc.create("rgScreen", Region::new()).unwrap();
    doc.append(shared_regions, screen).unwrap();

    let regions = doc.insert(RegionBase::new()).unwrap();
    let import = doc
        .insert(ImportBase::new("lib", "shared.ncl").unwrap())
        .unwrap();
    doc.append(regions, import).unwrap();
    doc.attach_import_document(import, shared).unwrap();

    let descriptor = doc.create("d", Descriptor::new()).unwrap();
    let region = doc
        .aliased_reference::<Region>(import, screen, TargetAttribute::Id)
        .unwrap();
    doc.modify::<Descriptor, _>(descriptor, |d| d.region = Some(region))
        .unwrap();

    assert_eq!(
        doc.render(descriptor, 0),
        "<descriptor id='d' region='lib#rgScreen' />\n"
    );
    assert_eq!(doc.referrer_count(import), 1);

    assert!(doc.remove(regions, import).unwrap());
    assert_eq!(doc.referrer_count(import), 0);

    let region = doc.get::<Descriptor>(descriptor).unwrap().region.as_ref().unwrap();
    assert!(!region.is_attached(&doc));
    assert_eq!(region.resolve(&doc), Err(NclError::DanglingReference));
    assert_eq!(doc.render(descriptor, 0), "<descriptor id='d' />\n");
}

#[test]
fn test_alias_without_loaded_import_fails() {
    let xml = fs::read_to_string(get_sample_path("main.ncl")).unwrap();
    assert!(matches!(
        load(&xml),
        Err(NclError::UnresolvedImport { alias }) if alias == "base"
    ));
}

#[test]
fn test_unknown_alias_fails() {
    let xml = r#"<ncl id="doc"><head><descriptorBase>
        <descriptor id="d" region="nope#rg"/>
    </descriptorBase></head></ncl>"#;
    assert!(matches!(
        load(xml),
        Err(NclError::UnknownAlias { alias }) if alias == "nope"
    ));
}

// --- Samples ---

#[test]
fn test_sample_loads_and_validates() {
    let doc = load_file(&get_sample_path("main.ncl"), &LoaderConfig::default()).unwrap();
    assert_eq!(doc.documents().len(), 2);

    let report = doc.validate(doc.root());
    assert!(report.is_valid(), "errors: {:?}", report.errors);
    assert!(report.warnings.is_empty(), "warnings: {:?}", report.warnings);
}

#[test]
fn test_sample_renders_references() {
    let doc = load_file(&get_sample_path("main.ncl"), &LoaderConfig::default()).unwrap();
    let xml = doc.render(doc.root(), 0);

    for expected in [
        "\t\t\t<rule id='rEnglish' var='system.language' comparator='eq' value='en'/>\n",
        "\t\t\t<descriptor id='dLogo' region='base#rgLogo' focusIndex='1' focusBorderColor='white' />\n",
        "\t\t\t<importBase alias='base' documentURI='base.ncl'/>\n",
        "\t\t<media id='video' src='media/video.mp4' descriptor='base#dVideo'>\n",
        "\t\t<link id='lShowLogo' xconnector='base#onBeginStart'>\n",
        "\t\t\t<bind role='onBegin' component='video' interface='aCredits'/>\n",
        "\t\t<port id='pEntry' component='video'/>\n",
    ] {
        assert!(xml.contains(expected), "missing {:?} in\n{}", expected, xml);
    }
}

#[test]
fn test_sample_round_trips() {
    let doc = load_file(&get_sample_path("main.ncl"), &LoaderConfig::default()).unwrap();
    let written = doc.to_xml(&WriterConfig::default());

    let reloaded = load_with(&written, &LoaderConfig::default(), &sample_sources()).unwrap();
    assert_eq!(
        reloaded.render(reloaded.root(), 0),
        doc.render(doc.root(), 0)
    );
}

#[test]
fn test_missing_import_source_fails() {
    let xml = fs::read_to_string(get_sample_path("main.ncl")).unwrap();
    let sources: HashMap<String, String> = HashMap::new();
    assert!(matches!(
        load_with(&xml, &LoaderConfig::default(), &sources),
        Err(NclError::SourceUnavailable { uri, .. }) if uri == "base.ncl"
    ));
}
