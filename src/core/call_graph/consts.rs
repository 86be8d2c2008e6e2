// src/core/call_graph/consts.rs - Fixed vocabularies used by the resolution heuristics

/// Primitives, boxed primitives and platform types that never produce an edge
pub const BUILTIN_TYPES: &[&str] = &[
    "int", "boolean", "char", "byte", "short", "long", "float", "double", "void", "var",
    "String", "Integer", "Boolean", "Character", "Byte", "Short", "Long", "Float", "Double",
    "Number", "Object", "Class", "Void", "CharSequence", "StringBuilder",
];

/// Generic container families; any parameterization of these is skipped too
pub const CONTAINER_TYPES: &[&str] = &[
    "List", "Map", "Set", "Collection", "Iterable", "Iterator", "Optional", "Stream",
    "ArrayList", "HashMap", "HashSet", "LinkedList", "LinkedHashMap", "LinkedHashSet",
    "TreeMap", "TreeSet", "Queue", "Deque", "ArrayDeque",
];

/// The universal root type; superclass fallback stops here
pub const UNIVERSAL_ROOT: &[&str] = &["Object", "java.lang.Object"];

/// Ubiquitous object and collection methods that never form a cross-component edge
pub const IGNORED_METHODS: &[&str] = &[
    "equals", "hashCode", "toString", "clone", "getClass", "notify", "notifyAll", "wait",
    "get", "set", "add", "remove", "size", "isEmpty", "contains", "forEach", "stream",
    "of", "format", "valueOf", "parse", "compareTo", "iterator", "hasNext", "next",
];

/// Supertypes recognized as a generic persistence-repository contract
pub const REPOSITORY_CONTRACTS: &[&str] = &[
    "Repository",
    "CrudRepository",
    "ListCrudRepository",
    "PagingAndSortingRepository",
    "ListPagingAndSortingRepository",
    "JpaRepository",
];

/// Method-name prefixes of derived queries, executed directly against the store
pub const DERIVED_QUERY_PREFIXES: &[&str] = &[
    "findBy", "getBy", "queryBy", "searchBy", "countBy", "existsBy",
];

/// Generic CRUD operations implemented by the persistence framework
pub const CRUD_METHODS: &[&str] = &[
    "save", "saveAll", "findById", "findAll", "deleteById", "delete", "count", "existsById",
];

/// Annotation marking a repository method with a hand-written query
pub const CUSTOM_QUERY_ANNOTATION: &str = "Query";

/// Java keywords that look like calls when followed by `(`
pub const CALL_LIKE_KEYWORDS: &[&str] = &[
    "if", "for", "while", "switch", "catch", "synchronized", "return", "new", "throw",
    "assert", "super", "this", "else", "try", "do", "case", "yield", "instanceof",
];

/// Declaration modifiers recognized by the heuristic analyzer
pub const MODIFIERS: &[&str] = &[
    "public", "private", "protected", "static", "final", "abstract", "default",
    "synchronized", "native", "strictfp", "transient", "volatile", "sealed", "non-sealed",
];
