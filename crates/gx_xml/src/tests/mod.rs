use alloc::string::{String, ToString};
use alloc::vec;
use alloc::vec::Vec;

use chrono::NaiveDate;
use gx_reflect::derive::{Persist, PersistEnum};
use gx_reflect::graph::{ObjectGraph, ObjectId};
use gx_reflect::name::{ModuleIdentity, TypeKey, builtin};
use gx_reflect::registry::{FormatError, PersistFormatter, ValueFormatter};
use gx_reflect::resolver::{ResolverConfig, TypeNameResolver};
use gx_reflect::value::{Color, IntoValue, PointF, Value};

use crate::{CodecConfig, DecodeError, EncodeError, SerializationContext, VersionPolicy};

// -----------------------------------------------------------------------------
// Fixtures

#[derive(Persist, Debug)]
#[persist(type_name = "demo.Node", module = "demo", version = "1.0.0.0")]
struct Node {
    #[persist(name = "Name", arg = 0)]
    name: String,
    #[persist(name = "Next")]
    next: Option<ObjectId>,
    #[persist(name = "Weight")]
    weight: f64,
}

impl Node {
    fn named(name: &str) -> Self {
        Self {
            name: name.into(),
            next: None,
            weight: 0.5,
        }
    }
}

#[derive(PersistEnum, Clone, Copy, Debug, Default, PartialEq)]
#[persist(type_name = "demo.Fill", module = "demo", version = "1.0.0.0")]
enum Fill {
    #[default]
    Solid,
    #[persist(name = "Hatched")]
    Hatch,
}

/// Writes a point as `WxH`.
#[derive(Default)]
struct SizeFormatter;

impl ValueFormatter for SizeFormatter {
    fn format(&self, value: &Value) -> Result<String, FormatError> {
        match value {
            Value::Point(p) => Ok(alloc::format!("{}x{}", p.x, p.y)),
            other => Err(FormatError::new(alloc::format!("cannot format a {} as size", other.kind()))),
        }
    }

    fn parse(&self, text: &str) -> Result<Value, FormatError> {
        let parsed = text
            .split_once('x')
            .and_then(|(w, h)| Some(PointF::new(w.parse().ok()?, h.parse().ok()?)));
        parsed
            .map(Value::Point)
            .ok_or_else(|| FormatError::new(alloc::format!("`{text}` is not a size")))
    }
}

impl PersistFormatter for SizeFormatter {
    const TYPE_NAME: &'static str = "demo.SizeFormatter";
    const MODULE: ModuleIdentity = ModuleIdentity::from_static("demo", "1.0.0.0");
}

#[derive(Persist, Default)]
#[persist(type_name = "demo.Shape", module = "demo", version = "1.0.0.0")]
struct Shape {
    #[persist(name = "Label")]
    label: String,
    #[persist(name = "Fill")]
    fill: Fill,
    #[persist(name = "Size", formatter = SizeFormatter)]
    size: PointF,
    #[persist(name = "Stroke")]
    stroke: Color,
}

#[derive(Persist)]
#[persist(type_name = "demo.Circle", module = "demo", version = "1.0.0.0")]
struct Circle {
    #[persist(base)]
    shape: Shape,
    #[persist(name = "Radius", arg = 0)]
    radius: f32,
}

#[derive(Persist)]
#[persist(type_name = "demo.Drawing", module = "demo", version = "1.0.0.0")]
struct Drawing {
    #[persist(name = "Title", arg = 0)]
    title: Option<String>,
    #[persist(name = "Revision", arg = 1, readonly)]
    revision: u32,
    #[persist(name = "Shapes")]
    shapes: Option<ObjectId>,
    #[persist(name = "Created")]
    created: chrono::NaiveDateTime,
    #[persist(skip)]
    dirty: bool,
}

#[derive(Persist)]
#[persist(type_name = "demo.Scene", module = "demo", version = "1.0.0.0")]
struct Scene {
    #[persist(name = "Nodes")]
    nodes: Option<ObjectId>,
    #[persist(name = "Primary", arg = 0)]
    primary: ObjectId,
}

#[derive(Persist, Debug)]
#[persist(type_name = "demo.Triple", module = "demo", version = "1.0.0.0")]
struct Triple {
    #[persist(name = "A", arg = 0)]
    a: String,
    #[persist(name = "B", arg = 1)]
    b: i32,
    #[persist(name = "C", arg = 2)]
    c: bool,
}

fn context() -> SerializationContext {
    context_with(CodecConfig::default())
}

fn context_with(config: CodecConfig) -> SerializationContext {
    let context = SerializationContext::with_config(config);
    {
        let mut registry = context.registry().write();
        registry.register::<Node>();
        registry.register::<Shape>();
        registry.register::<Circle>();
        registry.register::<Drawing>();
        registry.register::<Scene>();
        registry.register::<Triple>();
        registry.register_enum::<Fill>();
        registry.register_formatter::<SizeFormatter>();
    }
    context
}

const NODE: &str = "demo.Node, demo, Version=1.0.0.0, Culture=neutral, PublicKeyToken=null";

/// A one-line document of a `demo.Node` root with the given members.
fn node_document(members: &str) -> String {
    alloc::format!(
        r#"<root type="1"><types><item key="1" value="{NODE}"/><item key="2" value="string, gx_core"/></types>{members}</root>"#
    )
}

fn root_id(value: &Value) -> ObjectId {
    value.as_object().unwrap()
}

// -----------------------------------------------------------------------------
// Round trips

#[test]
fn cycle_and_shared_references() {
    let context = context();
    let mut graph = ObjectGraph::new();
    let a = graph.insert(Node::named("a"));
    let b = graph.insert(Node::named("b"));
    graph.record_mut::<Node>(a).unwrap().next = Some(b);
    graph.record_mut::<Node>(b).unwrap().next = Some(a);

    let text = context.serialize(&graph, &Value::Object(a)).unwrap();
    assert!(text.contains(r#"id="1""#), "{text}");
    assert!(text.contains(r#"ref="1""#), "{text}");
    assert_eq!(text.matches("id=").count(), 1, "only the shared object gets an id");

    let decoded = context.deserialize(&text).unwrap();
    let a2 = root_id(&decoded.root);
    let first = decoded.root_record::<Node>().unwrap();
    assert_eq!(first.name, "a");
    assert_eq!(first.weight, 0.5);
    let b2 = first.next.unwrap();
    let second = decoded.graph.record::<Node>(b2).unwrap();
    assert_eq!(second.name, "b");
    assert_eq!(second.next, Some(a2));
    assert_eq!(decoded.graph.len(), 2);
}

#[test]
fn null_members_are_omitted() {
    let context = context();
    let mut graph = ObjectGraph::new();
    let node = graph.insert(Node::named("alone"));

    let text = context.serialize(&graph, &Value::Object(node)).unwrap();
    assert!(!text.contains(r#"name="Next""#), "{text}");
    assert!(!text.contains("id="), "{text}");

    let decoded = context.deserialize(&text).unwrap();
    assert_eq!(decoded.root_record::<Node>().unwrap().next, None);
}

#[test]
fn null_constructor_argument_is_written() {
    let context = context();
    let mut graph = ObjectGraph::new();
    let drawing = graph.insert(Drawing {
        title: None,
        revision: 7,
        shapes: None,
        created: NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_milli_opt(12, 30, 5, 250)
            .unwrap(),
        dirty: true,
    });

    let text = context.serialize(&graph, &Value::Object(drawing)).unwrap();
    assert!(text.contains(r#"name="Title" arg="0""#), "{text}");
    assert!(text.contains(r#"name="Revision" arg="1""#), "{text}");
    assert!(!text.contains("dirty"), "{text}");

    let decoded = context.deserialize(&text).unwrap();
    let copy = decoded.root_record::<Drawing>().unwrap();
    assert_eq!(copy.title, None);
    assert_eq!(copy.revision, 7);
    assert_eq!(copy.created, graph.record::<Drawing>(drawing).unwrap().created);
    assert!(!copy.dirty);
}

#[test]
fn lists_keep_nulls_and_shared_items() {
    let context = context();
    let mut graph = ObjectGraph::new();
    let node = graph.insert(Node::named("shared"));
    let list = graph.insert_list(
        TypeKey::from_static("demo.Node"),
        vec![Value::Object(node), Value::Null, Value::Object(node)],
    );

    let text = context.serialize(&graph, &Value::Object(list)).unwrap();
    assert!(text.contains("list[[demo.Node, demo, Version=1.0.0.0"), "{text}");

    let decoded = context.deserialize(&text).unwrap();
    let items = &decoded.graph.list(root_id(&decoded.root)).unwrap().items;
    assert_eq!(items.len(), 3);
    assert!(items[1].is_null());
    assert_eq!(items[0], items[2]);
    let shared = items[0].as_object().unwrap();
    assert_eq!(decoded.graph.record::<Node>(shared).unwrap().name, "shared");
    assert_eq!(decoded.graph.list(root_id(&decoded.root)).unwrap().element.as_str(), "demo.Node");
}

#[test]
fn arrays_and_maps() {
    let context = context();
    let mut graph = ObjectGraph::new();
    let array = graph.insert_array(builtin::I32, vec![Value::I32(3), Value::I32(-1)]);
    let map = graph.insert_map(vec![
        (Value::String("numbers".into()), Value::Object(array)),
        (Value::I64(2), Value::Bool(true)),
        (Value::Char('k'), Value::Null),
    ]);

    let text = context.serialize(&graph, &Value::Object(map)).unwrap();
    let decoded = context.deserialize(&text).unwrap();
    let entries = decoded.graph.map(root_id(&decoded.root)).unwrap();
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0].0, Value::String("numbers".into()));
    assert_eq!(entries[1], (Value::I64(2), Value::Bool(true)));
    assert_eq!(entries[2], (Value::Char('k'), Value::Null));

    let array = decoded.graph.array(entries[0].1.as_object().unwrap()).unwrap();
    assert_eq!(array.element, builtin::I32);
    assert_eq!(array.items, [Value::I32(3), Value::I32(-1)]);
}

#[test]
fn inheritance_enums_and_formatters() {
    let context = context();
    let mut graph = ObjectGraph::new();
    let circle = graph.insert(Circle {
        shape: Shape {
            label: "wheel".into(),
            fill: Fill::Hatch,
            size: PointF::new(4.0, 2.5),
            stroke: Color::argb(0x80, 0x10, 0x20, 0x30),
        },
        radius: 1.25,
    });
    let shapes = graph.insert_list(TypeKey::from_static("demo.Shape"), vec![Value::Object(circle)]);

    let text = context.serialize(&graph, &Value::Object(shapes)).unwrap();
    assert!(text.contains(r#"value="Hatched""#), "{text}");
    assert!(text.contains(r#"value="4x2.5""#), "{text}");
    assert!(text.contains("demo.SizeFormatter, demo"), "{text}");

    let decoded = context.deserialize(&text).unwrap();
    let item = decoded.graph.list(root_id(&decoded.root)).unwrap().items[0].as_object().unwrap();
    let copy = decoded.graph.record::<Circle>(item).unwrap();
    assert_eq!(copy.radius, 1.25);
    assert_eq!(copy.shape.label, "wheel");
    assert_eq!(copy.shape.fill, Fill::Hatch);
    assert_eq!(copy.shape.size, PointF::new(4.0, 2.5));
    assert_eq!(copy.shape.stroke, Color::argb(0x80, 0x10, 0x20, 0x30));
}

#[test]
fn constructor_arguments_are_written_first() {
    let context = context();
    let mut graph = ObjectGraph::new();
    let primary = graph.insert(Node::named("primary"));
    let nodes = graph.insert_list(TypeKey::from_static("demo.Node"), vec![Value::Object(primary)]);
    let scene = graph.insert(Scene {
        nodes: Some(nodes),
        primary,
    });

    let text = context.serialize(&graph, &Value::Object(scene)).unwrap();
    let primary_at = text.find(r#"name="Primary""#).unwrap();
    let nodes_at = text.find(r#"name="Nodes""#).unwrap();
    assert!(primary_at < nodes_at, "{text}");

    let decoded = context.deserialize(&text).unwrap();
    let copy = decoded.root_record::<Scene>().unwrap();
    let items = &decoded.graph.list(copy.nodes.unwrap()).unwrap().items;
    assert_eq!(items, &[Value::Object(copy.primary)]);
    assert_eq!(decoded.graph.record::<Node>(copy.primary).unwrap().name, "primary");
    assert_eq!(decoded.graph.len(), 3);
}

#[test]
fn attribute_text_is_escaped() {
    let context = context();
    let mut graph = ObjectGraph::new();
    let node = graph.insert(Node::named(r#"a & b < c "d" 'e'"#));

    let text = context.serialize(&graph, &Value::Object(node)).unwrap();
    assert!(
        text.contains(r#"value="a &amp; b &lt; c &quot;d&quot; &apos;e&apos;""#),
        "{text}"
    );
    let decoded = context.deserialize(&text).unwrap();
    assert_eq!(decoded.root_record::<Node>().unwrap().name, r#"a & b < c "d" 'e'"#);
}

#[test]
fn inline_roots() {
    let context = context();
    let graph = ObjectGraph::new();

    let text = context.serialize(&graph, &Value::String("plain".into())).unwrap();
    let (_, value) = context.decoder().deserialize_as::<String>(&text).unwrap();
    assert_eq!(value, "plain");

    let text = context.serialize(&graph, &Fill::Solid.into_value()).unwrap();
    let (_, fill) = context.decoder().deserialize_as::<Fill>(&text).unwrap();
    assert_eq!(fill, Fill::Solid);

    let err = context.serialize(&graph, &Value::Null).unwrap_err();
    assert!(matches!(err, EncodeError::NullRoot));
}

// -----------------------------------------------------------------------------
// Output settings

#[test]
fn layout_follows_config() {
    let mut graph = ObjectGraph::new();
    let node = graph.insert(Node::named("n"));

    let pretty = context().serialize(&graph, &Value::Object(node)).unwrap();
    assert!(pretty.starts_with("<?xml version=\"1.0\" encoding=\"utf-8\"?>"), "{pretty}");
    assert!(pretty.contains("\n  <types>"), "{pretty}");

    let compact = context_with(CodecConfig {
        indent: None,
        declaration: false,
        ..CodecConfig::default()
    })
    .serialize(&graph, &Value::Object(node))
    .unwrap();
    assert!(compact.starts_with("<root"), "{compact}");
    assert!(!compact.contains('\n'), "{compact}");
}

#[test]
fn encoder_is_reusable() {
    let context = context();
    let mut graph = ObjectGraph::new();
    let a = graph.insert(Node::named("a"));
    graph.record_mut::<Node>(a).unwrap().next = Some(a);

    let first = context.encoder().serialize(&graph, &Value::Object(a)).unwrap();
    let second = context.encoder().serialize(&graph, &Value::Object(a)).unwrap();
    assert_eq!(first, second);
    assert!(first.contains(r#"<types>"#));
}

// -----------------------------------------------------------------------------
// Decoding

#[test]
fn unknown_members_are_skipped() {
    let text = node_document(
        r#"<member name="Name" arg="0" type="2" value="x"/><member name="Obsolete" type="2" value="y"/>"#,
    );
    let decoded = context().deserialize(&text).unwrap();
    assert_eq!(decoded.root_record::<Node>().unwrap().name, "x");
}

#[test]
fn constructor_argument_gap() {
    let text = node_document(r#"<member name="Name" arg="1" type="2" value="x"/>"#);
    let err = context().deserialize(&text).unwrap_err();
    assert!(
        matches!(err, DecodeError::ConstructorArgumentGap { expected: 0, found: 1, .. }),
        "{err:?}"
    );
}

const TRIPLE_TYPES: &str = concat!(
    r#"<types><item key="1" value="demo.Triple, demo, Version=1.0.0.0, Culture=neutral, PublicKeyToken=null"/>"#,
    r#"<item key="2" value="string, gx_core"/><item key="3" value="i32, gx_core"/>"#,
    r#"<item key="4" value="bool, gx_core"/></types>"#,
);

#[test]
fn constructor_arguments_in_any_document_order() {
    let text = alloc::format!(
        r#"<root type="1">{TRIPLE_TYPES}<member name="C" arg="2" type="4" value="true"/><member name="A" arg="0" type="2" value="first"/><member name="B" arg="1" type="3" value="-4"/></root>"#
    );
    let decoded = context().deserialize(&text).unwrap();
    let triple = decoded.root_record::<Triple>().unwrap();
    assert_eq!(triple.a, "first");
    assert_eq!(triple.b, -4);
    assert!(triple.c);
}

#[test]
fn constructor_argument_gap_in_the_middle() {
    let text = alloc::format!(
        r#"<root type="1">{TRIPLE_TYPES}<member name="C" arg="2" type="4" value="true"/><member name="A" arg="0" type="2" value="first"/></root>"#
    );
    let err = context().deserialize(&text).unwrap_err();
    assert!(
        matches!(err, DecodeError::ConstructorArgumentGap { expected: 1, found: 2, .. }),
        "{err:?}"
    );
}

#[test]
fn unresolved_reference() {
    let text = node_document(
        r#"<member name="Name" arg="0" type="2" value="x"/><member name="Next" ref="7"/>"#,
    );
    let err = context().deserialize(&text).unwrap_err();
    match err {
        DecodeError::UnresolvedReference { path, reference } => {
            assert_eq!(reference, 7);
            assert_eq!(path, "root/member[Next]");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn invalid_scalars_report_their_path() {
    let text = alloc::format!(
        r#"<root type="1"><types><item key="1" value="{NODE}"/><item key="2" value="string, gx_core"/><item key="3" value="f64, gx_core"/></types><member name="Name" arg="0" type="2" value="x"/><member name="Weight" type="3" value="heavy"/></root>"#
    );
    let err = context().deserialize(&text).unwrap_err();
    assert!(err.to_string().contains("root/member[Weight]"), "{err}");
    assert!(matches!(err, DecodeError::InvalidScalar { .. }), "{err:?}");
}

#[test]
fn unknown_types_fail() {
    let text = r#"<root type="1"><types><item key="1" value="demo.Missing, demo, Version=1.0.0.0"/></types></root>"#;
    let err = context().deserialize(text).unwrap_err();
    assert!(matches!(err, DecodeError::UnknownType { ref name } if name.starts_with("demo.Missing")));
}

#[test]
fn stale_versions() {
    let mut graph = ObjectGraph::new();
    let node = graph.insert(Node::named("old"));
    let text = context()
        .serialize(&graph, &Value::Object(node))
        .unwrap()
        .replace("demo, Version=1.0.0.0", "demo, Version=0.9.0.0");

    let repaired = context().deserialize(&text).unwrap();
    assert_eq!(repaired.root_record::<Node>().unwrap().name, "old");

    let exact = context_with(CodecConfig {
        version_policy: VersionPolicy::Exact,
        ..CodecConfig::default()
    });
    assert!(matches!(exact.deserialize(&text), Err(DecodeError::UnknownType { .. })));
}

#[test]
fn renamed_module_needs_ignore_version() {
    let empty = tempfile::tempdir().unwrap();
    let with_policy = |version_policy| {
        let config = CodecConfig {
            version_policy,
            resolver: ResolverConfig {
                search_roots: vec![empty.path().to_path_buf()],
                ..ResolverConfig::default()
            },
            ..CodecConfig::default()
        };
        let resolver = TypeNameResolver::new(config.resolver.clone());
        let context = SerializationContext::with_resolver(config, resolver);
        context.register::<Node>();
        context
    };

    let mut graph = ObjectGraph::new();
    let node = graph.insert(Node::named("moved"));
    let text = with_policy(VersionPolicy::Repair)
        .serialize(&graph, &Value::Object(node))
        .unwrap()
        .replace("demo, Version=1.0.0.0", "demo_legacy, Version=0.3.0.0");

    let err = with_policy(VersionPolicy::Repair).deserialize(&text).unwrap_err();
    assert!(matches!(err, DecodeError::UnknownType { .. }), "{err:?}");

    let decoded = with_policy(VersionPolicy::IgnoreVersion).deserialize(&text).unwrap();
    assert_eq!(decoded.root_record::<Node>().unwrap().name, "moved");
}

#[test]
fn deserialize_into_existing_object() {
    let context = context();
    let mut source = ObjectGraph::new();
    let node = source.insert(Node {
        name: "fresh".into(),
        next: None,
        weight: 3.0,
    });
    let text = context.serialize(&source, &Value::Object(node)).unwrap();

    let mut graph = ObjectGraph::new();
    let target = graph.insert(Node::named("stale"));
    context.decoder().deserialize_into(&mut graph, target, &text).unwrap();
    let updated = graph.record::<Node>(target).unwrap();
    assert_eq!(updated.name, "fresh");
    assert_eq!(updated.weight, 3.0);
    assert_eq!(graph.len(), 1);

    let list = graph.insert_list(builtin::STRING, Vec::new());
    let err = context.decoder().deserialize_into(&mut graph, list, &text).unwrap_err();
    assert!(matches!(err, DecodeError::TargetMismatch { .. }), "{err:?}");
}

#[test]
fn failed_deserialize_into_changes_nothing() {
    let context = context();
    let mut graph = ObjectGraph::new();
    let target = graph.insert(Node::named("stale"));
    let nested = r#"<member name="Next" type="1"><member name="Name" arg="0" type="2" value="inner"/></member>"#;

    let bad_scalar = alloc::format!(
        r#"<root type="1"><types><item key="1" value="{NODE}"/><item key="2" value="string, gx_core"/><item key="3" value="f64, gx_core"/></types><member name="Name" arg="0" type="2" value="changed"/>{nested}<member name="Weight" type="3" value="heavy"/></root>"#
    );
    let err = context.decoder().deserialize_into(&mut graph, target, &bad_scalar).unwrap_err();
    assert!(matches!(err, DecodeError::InvalidScalar { .. }), "{err:?}");

    let wrong_type = node_document(&alloc::format!(
        r#"<member name="Name" arg="0" type="2" value="changed"/>{nested}<member name="Weight" type="2" value="heavy"/>"#
    ));
    let err = context.decoder().deserialize_into(&mut graph, target, &wrong_type).unwrap_err();
    match err {
        DecodeError::Value { path, .. } => assert_eq!(path, "root/member[Weight]"),
        other => panic!("unexpected error: {other:?}"),
    }

    let node = graph.record::<Node>(target).unwrap();
    assert_eq!(node.name, "stale");
    assert_eq!(node.next, None);
    assert_eq!(node.weight, 0.5);
    assert_eq!(graph.len(), 1);
}

#[test]
fn deserialize_into_array_needs_same_length() {
    let context = context();
    let mut source = ObjectGraph::new();
    let three = source.insert_array(builtin::I32, vec![Value::I32(1), Value::I32(2), Value::I32(3)]);
    let text = context.serialize(&source, &Value::Object(three)).unwrap();

    let mut graph = ObjectGraph::new();
    let two = graph.insert_array(builtin::I32, vec![Value::I32(7), Value::I32(8)]);
    let err = context.decoder().deserialize_into(&mut graph, two, &text).unwrap_err();
    assert!(matches!(err, DecodeError::Structural { .. }), "{err:?}");
    assert_eq!(graph.array(two).unwrap().items, [Value::I32(7), Value::I32(8)]);

    let same = graph.insert_array(builtin::I32, vec![Value::Null; 3]);
    context.decoder().deserialize_into(&mut graph, same, &text).unwrap();
    assert_eq!(graph.array(same).unwrap().items, [Value::I32(1), Value::I32(2), Value::I32(3)]);
}

#[test]
fn malformed_documents() {
    let context = context();
    assert!(matches!(
        context.deserialize("<root"),
        Err(DecodeError::Xml(_) | DecodeError::Structural { .. })
    ));
    assert!(matches!(
        context.deserialize(r#"<root type="9"><types/></root>"#),
        Err(DecodeError::UndeclaredType { id: 9, .. })
    ));
    assert!(matches!(
        context.deserialize(r#"<root type="1"><types><item key="1" value="[[x"/></types></root>"#),
        Err(DecodeError::TypeName { .. })
    ));
}
