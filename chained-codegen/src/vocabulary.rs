//! Fixed Java lookup tables and runtime class names.
//!
//! Built once per process and passed by reference; nothing here is mutated
//! after construction.

use std::collections::{HashMap, HashSet};

use chained_manifest::RuntimeConfig;

use crate::TypeNode;

const PRIMITIVES: [&str; 8] = [
    "byte", "short", "int", "long", "float", "double", "boolean", "char",
];

const BOXES: [(&str, &str); 8] = [
    ("Byte", "byte"),
    ("Short", "short"),
    ("Integer", "int"),
    ("Long", "long"),
    ("Float", "float"),
    ("Double", "double"),
    ("Boolean", "boolean"),
    ("Character", "char"),
];

const OPTIONAL: &str = "java.util.Optional";

/// Declared container type -> default mutable implementation.
const CONTAINERS: [(&str, ContainerKind, &str); 14] = [
    ("java.util.List", ContainerKind::List, "java.util.ArrayList"),
    ("java.util.ArrayList", ContainerKind::List, "java.util.ArrayList"),
    ("java.util.LinkedList", ContainerKind::List, "java.util.LinkedList"),
    ("java.util.Set", ContainerKind::Set, "java.util.HashSet"),
    ("java.util.HashSet", ContainerKind::Set, "java.util.HashSet"),
    ("java.util.LinkedHashSet", ContainerKind::Set, "java.util.LinkedHashSet"),
    ("java.util.SortedSet", ContainerKind::Set, "java.util.TreeSet"),
    ("java.util.TreeSet", ContainerKind::Set, "java.util.TreeSet"),
    ("java.util.Map", ContainerKind::Map, "java.util.LinkedHashMap"),
    ("java.util.HashMap", ContainerKind::Map, "java.util.HashMap"),
    ("java.util.LinkedHashMap", ContainerKind::Map, "java.util.LinkedHashMap"),
    ("java.util.SortedMap", ContainerKind::Map, "java.util.TreeMap"),
    ("java.util.NavigableMap", ContainerKind::Map, "java.util.TreeMap"),
    ("java.util.TreeMap", ContainerKind::Map, "java.util.TreeMap"),
];

/// Containers whose builder value is wrapped in an unmodifiable view.
const UNMODIFIABLE: [&str; 3] = ["java.util.List", "java.util.Set", "java.util.Map"];

/// Container shape for sub-builder generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    List,
    Set,
    Map,
}

impl ContainerKind {
    /// Expected number of type arguments
    pub fn arity(&self) -> usize {
        match self {
            Self::List | Self::Set => 1,
            Self::Map => 2,
        }
    }
}

/// A recognised container type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerShape {
    pub kind: ContainerKind,
    /// Qualified class instantiated when the field is first mutated
    pub implementation: &'static str,
}

/// Qualified names of the classes generated code depends on at run time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeNames {
    pub preconditions: String,
    pub helpers: String,
    pub list_builder: String,
    pub set_builder: String,
    pub map_builder: String,
    pub generated: String,
    pub nonnull: String,
    pub nullable: String,
    /// Value of the `@Generated` annotation
    pub generator: String,
}

impl Default for RuntimeNames {
    fn default() -> Self {
        Self {
            preconditions: "com.github.davidmoten.chained.api.Preconditions".into(),
            helpers: "com.github.davidmoten.chained.api.Helpers".into(),
            list_builder: "com.github.davidmoten.chained.api.ListBuilder".into(),
            set_builder: "com.github.davidmoten.chained.api.SetBuilder".into(),
            map_builder: "com.github.davidmoten.chained.api.MapBuilder".into(),
            generated: "jakarta.annotation.Generated".into(),
            nonnull: "jakarta.annotation.Nonnull".into(),
            nullable: "jakarta.annotation.Nullable".into(),
            generator: "com.github.davidmoten:chained-processor".into(),
        }
    }
}

/// Java knowledge shared by every generation call.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    primitives: HashSet<&'static str>,
    boxes: HashMap<String, &'static str>,
    containers: HashMap<&'static str, ContainerShape>,
    /// Simple name -> qualified name for the `java.util` types above
    qualified: HashMap<&'static str, &'static str>,
    runtime: RuntimeNames,
}

impl Vocabulary {
    /// The standard Java vocabulary with the default runtime library.
    pub fn java() -> Self {
        let boxes = BOXES
            .iter()
            .flat_map(|&(boxed, primitive)| {
                [
                    (boxed.to_string(), primitive),
                    (format!("java.lang.{boxed}"), primitive),
                ]
            })
            .collect();
        let containers = CONTAINERS
            .iter()
            .map(|&(declared, kind, implementation)| {
                (declared, ContainerShape {
                    kind,
                    implementation,
                })
            })
            .collect();
        let qualified = CONTAINERS
            .iter()
            .map(|&(declared, _, _)| declared)
            .chain([OPTIONAL])
            .map(|name| (chained_core::simple_name(name), name))
            .collect();

        Self {
            primitives: PRIMITIVES.into_iter().collect(),
            boxes,
            containers,
            qualified,
            runtime: RuntimeNames::default(),
        }
    }

    /// Replace runtime class names with the ones configured in the manifest.
    pub fn with_overrides(mut self, config: &RuntimeConfig) -> Self {
        let overrides = [
            (&config.preconditions, &mut self.runtime.preconditions),
            (&config.helpers, &mut self.runtime.helpers),
            (&config.list_builder, &mut self.runtime.list_builder),
            (&config.set_builder, &mut self.runtime.set_builder),
            (&config.map_builder, &mut self.runtime.map_builder),
            (&config.generated, &mut self.runtime.generated),
            (&config.nonnull, &mut self.runtime.nonnull),
            (&config.nullable, &mut self.runtime.nullable),
            (&config.generator, &mut self.runtime.generator),
        ];
        for (value, slot) in overrides {
            if let Some(value) = value {
                slot.clone_from(value);
            }
        }
        self
    }

    pub fn runtime(&self) -> &RuntimeNames {
        &self.runtime
    }

    pub fn is_primitive(&self, text: &str) -> bool {
        self.primitives.contains(text.trim())
    }

    /// Primitive counterpart of a boxed type, or the input unchanged.
    pub fn unbox<'a>(&self, text: &'a str) -> &'a str {
        self.boxes.get(text).copied().unwrap_or(text)
    }

    /// Replace bare `Optional`, `List`, `Map` and friends with their
    /// `java.util` names, at any depth, so they get imported.
    pub fn qualify(&self, node: &TypeNode) -> TypeNode {
        let base = self
            .qualified
            .get(node.base())
            .copied()
            .unwrap_or(node.base());
        let args = node.args().iter().map(|arg| self.qualify(arg)).collect();
        TypeNode::new(base, args)
    }

    /// Whether `node` is `Optional<T>`-shaped.
    pub fn is_optional(&self, node: &TypeNode) -> bool {
        node.base() == OPTIONAL && node.args().len() == 1
    }

    /// Container shape of `node` when it has the expected number of type arguments.
    pub fn container(&self, node: &TypeNode) -> Option<ContainerShape> {
        self.containers
            .get(node.base())
            .filter(|shape| shape.kind.arity() == node.args().len())
            .copied()
    }

    /// Whether values of `node` are passed through `Helpers.unmodifiable`.
    pub fn is_unmodifiable(&self, node: &TypeNode) -> bool {
        UNMODIFIABLE.contains(&node.base()) && self.container(node).is_some()
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::java()
    }
}
