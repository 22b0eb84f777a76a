// Reserved name reported for constructor members, as in class files
pub const CONSTRUCTOR_NAME: &str = "<init>";

// Exception type declared by rewritten private methods
pub const DEFAULT_PERMISSIVE_EXCEPTION: &str = "Exception";

// Marker annotation placed on generated overrides
pub const OVERRIDE_ANNOTATION: &str = "Override";

// Suffix appended to the original simple name by the driver
pub const DEFAULT_CLASS_SUFFIX: &str = "Testable";

pub const DEFAULT_INDENT_WIDTH: usize = 4;

// Parser: maximum iterations for any guarded loop
pub const PARSER_MAX_LOOP_ITERS: usize = 200_000;

// Primitive type keywords, `void` included
pub const PRIMITIVE_TYPES: &[&str] = &[
    "boolean", "byte", "short", "int", "long", "char", "float", "double", "void",
];

// Annotation marking a mock method in a test class
pub const MOCK_METHOD_ANNOTATION: &str = "MockMethod";
