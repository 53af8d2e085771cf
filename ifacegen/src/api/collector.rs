//! Transitive header walk and the registry of class records built from it.

use std::{
    collections::{HashMap, HashSet},
    fs,
    path::{Component, Path, PathBuf},
};

use roxygen::roxygen;

use crate::{
    api::record::{ClassInterface, ClassType},
    error::{Error, Result},
    frontend::{Decl, Frontend, NativeType, TranslationUnit},
    types::naming::to_target_type_name,
};

/// Compiler arguments every file is parsed with, before the include directories
pub const BASE_COMPILE_ARGS: [&str; 2] = ["-xc++", "-std=c++11"];

/// Builder for configuring [`Collector`] instances
///
/// # Example
///
/// ```
/// let collector = ifacegen::Collector::builder()
///     .recursive(true)
///     .system_include_path("/usr/include")
///     .compile_arg("-DGINAC_NO_THREADS")
///     .build();
/// assert!(collector.compile_args().contains(&"-I/usr/include".to_string()));
/// ```
pub struct Builder {
    recursive: bool,
    system_include_paths: Vec<PathBuf>,
    extra_args: Vec<String>,
}

impl Builder {
    pub fn new() -> Self {
        Self {
            recursive: true,
            system_include_paths: Vec::new(),
            extra_args: Vec::new(),
        }
    }

    /// Walk into included headers before the declarations of the including file.
    ///
    /// Enabled by default.
    #[roxygen]
    pub fn recursive(
        mut self,
        /// Whether included headers are walked
        recursive: bool,
    ) -> Self {
        self.recursive = recursive;
        self
    }

    /// Add a system include directory.
    ///
    /// It is passed to the frontend as `-I<path>`, and headers below it are never walked.
    #[roxygen]
    pub fn system_include_path<P: Into<PathBuf>>(
        mut self,
        /// The include directory, typically from `discover_system_include_paths`
        path: P,
    ) -> Self {
        self.system_include_paths.push(path.into());
        self
    }

    pub fn system_include_paths<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.system_include_paths
            .extend(paths.into_iter().map(Into::into));
        self
    }

    /// Add an extra compiler argument, passed after the include directories.
    #[roxygen]
    pub fn compile_arg<S: Into<String>>(
        mut self,
        /// The argument, e.g. `-DNDEBUG` or `-I/opt/ginac/include`
        arg: S,
    ) -> Self {
        self.extra_args.push(arg.into());
        self
    }

    pub fn build(self) -> Collector {
        let compile_args = BASE_COMPILE_ARGS
            .iter()
            .map(|a| a.to_string())
            .chain(
                self.system_include_paths
                    .iter()
                    .map(|p| format!("-I{}", p.display())),
            )
            .chain(self.extra_args)
            .collect();
        Collector {
            recursive: self.recursive,
            system_include_paths: self.system_include_paths,
            compile_args,
            visited_headers: HashSet::new(),
            walked: Vec::new(),
            data: Vec::new(),
            by_target_name: HashMap::new(),
        }
    }
}

impl Default for Builder {
    fn default() -> Self {
        Self::new()
    }
}

/// State of one extraction run.
///
/// Holds the set of headers already walked and the class records, keyed by their target
/// name. A collector is created per run and passed explicitly through the traversal.
pub struct Collector {
    recursive: bool,
    system_include_paths: Vec<PathBuf>,
    compile_args: Vec<String>,
    /// Only grows; a header is parsed at most once per run
    visited_headers: HashSet<PathBuf>,
    /// Declarations returned by recursive walks so far
    walked: Vec<Decl>,
    /// Class records in creation order
    data: Vec<ClassInterface>,
    by_target_name: HashMap<String, RecordEntry>,
}

/// Position of a class record and the qualified native spelling that created it
struct RecordEntry {
    index: usize,
    qualified_name: String,
}

impl Collector {
    pub fn builder() -> Builder {
        Builder::new()
    }

    pub fn compile_args(&self) -> &[String] {
        &self.compile_args
    }

    pub fn system_include_paths(&self) -> &[PathBuf] {
        &self.system_include_paths
    }

    pub fn is_recursive(&self) -> bool {
        self.recursive
    }

    /// Every declaration recursive walks have returned in this run, in walk order.
    ///
    /// Each header contributes once, so classes found behind a header walked earlier can
    /// still be collected from here. Always empty in non-recursive mode.
    pub fn walked_decls(&self) -> &[Decl] {
        &self.walked
    }

    pub fn is_visited(&self, path: &Path) -> bool {
        self.visited_headers.contains(&visit_key(path))
    }

    /// Parse a file with the collector's compiler arguments.
    pub fn parse<F: Frontend + ?Sized>(&self, frontend: &F, path: &Path) -> Result<TranslationUnit> {
        frontend.parse(path, &self.compile_args)
    }

    fn in_system_include_paths(&self, path: &Path) -> bool {
        self.system_include_paths
            .iter()
            .any(|include_path| path.starts_with(include_path))
    }

    pub fn should_skip(&self, path: &Path) -> bool {
        self.is_visited(path) || self.in_system_include_paths(path)
    }

    fn visit_file(&mut self, path: &Path) {
        self.visited_headers.insert(visit_key(path));
    }

    /// All declarations reachable from `tu`, in preorder.
    ///
    /// In recursive mode the declarations of every included header that is neither visited
    /// nor a system header come first, depth-first in include order, and each unit only
    /// contributes the declarations written in its own file. The unit itself is marked
    /// visited up front, so include cycles back to it end there. A unit visited by an
    /// earlier walk yields nothing; see [`Collector::walked_decls`].
    ///
    /// Otherwise the unit's whole tree is returned, including what the frontend saw of its
    /// includes.
    pub fn walk<F: Frontend + ?Sized>(
        &mut self,
        frontend: &F,
        tu: TranslationUnit,
    ) -> Result<Vec<Decl>> {
        if self.recursive && self.is_visited(&tu.path) {
            log::debug!("{} already walked", tu.path.display());
            return Ok(Vec::new());
        }
        self.visit_file(&tu.path);
        let mut decls = Vec::new();
        self.walk_into(frontend, tu, &mut decls)?;
        if self.recursive {
            self.walked.extend(decls.iter().cloned());
        }
        Ok(decls)
    }

    fn walk_into<F: Frontend + ?Sized>(
        &mut self,
        frontend: &F,
        tu: TranslationUnit,
        out: &mut Vec<Decl>,
    ) -> Result<()> {
        if !self.recursive {
            out.extend(tu.decls);
            return Ok(());
        }
        for include in &tu.includes {
            if self.should_skip(include) {
                log::debug!("Skipping {}", include.display());
                continue;
            }
            self.visit_file(include);
            let included = self.parse(frontend, include)?;
            self.walk_into(frontend, included, out)?;
        }
        out.extend(tu.decls.into_iter().filter(|d| !d.from_include));
        Ok(())
    }

    /// The record of the class `native_name`, created empty on first request.
    ///
    /// Records are keyed by the derived target name, so repeated calls for the same class
    /// return the same record. A different native class deriving an already used target
    /// name is rejected with [`Error::TargetNameCollision`]. Classes are told apart by the
    /// qualified spelling of `native_type` (`GiNaC::symbol` and `other::symbol` differ),
    /// falling back to `native_name` when the type has no spelling.
    pub fn find_or_create_type(
        &mut self,
        native_name: &str,
        native_type: &NativeType,
    ) -> Result<&mut ClassType> {
        let target_name = to_target_type_name(native_name, native_type);
        let qualified_name = match native_type.spelling.as_str() {
            "" => native_name,
            spelling => spelling,
        };
        let index = match self.by_target_name.get(&target_name) {
            Some(entry) => {
                if entry.qualified_name != qualified_name {
                    return Err(Error::TargetNameCollision {
                        target: target_name,
                        existing: entry.qualified_name.clone(),
                        incoming: qualified_name.to_string(),
                    });
                }
                entry.index
            }
            None => {
                self.data.push(ClassInterface::new(
                    native_name,
                    ClassType::new(target_name.clone(), native_name),
                ));
                let index = self.data.len() - 1;
                self.by_target_name.insert(
                    target_name,
                    RecordEntry {
                        index,
                        qualified_name: qualified_name.to_string(),
                    },
                );
                index
            }
        };
        Ok(&mut self.data[index].class_type)
    }

    pub fn class_interface(&self, target_name: &str) -> Option<&ClassInterface> {
        self.by_target_name
            .get(target_name)
            .map(|entry| &self.data[entry.index])
    }

    pub fn class_interface_mut(&mut self, target_name: &str) -> Option<&mut ClassInterface> {
        self.by_target_name
            .get(target_name)
            .map(|entry| &mut self.data[entry.index])
    }

    /// Class records in the order they were created
    pub fn class_interfaces(&self) -> impl Iterator<Item = &ClassInterface> {
        self.data.iter()
    }

    pub fn class_interfaces_mut(&mut self) -> impl Iterator<Item = &mut ClassInterface> {
        self.data.iter_mut()
    }

    pub fn into_class_interfaces(self) -> Vec<ClassInterface> {
        self.data
    }
}

/// Lexical form of `path` used in the visited set: canonical when the file exists, otherwise
/// with `.` components removed, so `./a.h` and `a.h` are the same header.
fn visit_key(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| {
        path.components()
            .filter(|c| !matches!(c, Component::CurDir))
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        api::record::{Method, MethodKind, ReturnType},
        frontend::{memory::MemoryFrontend, DeclKind},
    };

    fn decl(name: &str) -> Decl {
        Decl::new(DeclKind::ClassDecl, name)
    }

    fn names(decls: &[Decl]) -> Vec<&str> {
        decls.iter().map(|d| d.name.as_str()).collect()
    }

    fn method(name: &str) -> Method {
        Method {
            kind: MethodKind::CxxMethod,
            native_name: name.to_string(),
            target_name: name.to_string(),
            params: Vec::new(),
            return_type: ReturnType {
                target: "Bool".to_string(),
                native: "bool".to_string(),
                to_target_expr: "%s".to_string(),
            },
        }
    }

    #[test]
    fn test_compile_args() {
        let collector = Collector::builder()
            .system_include_paths(["/usr/include", "/usr/local/include"])
            .compile_arg("-DX")
            .build();
        assert_eq!(
            collector.compile_args(),
            ["-xc++", "-std=c++11", "-I/usr/include", "-I/usr/local/include", "-DX"]
        );
    }

    #[test]
    fn test_walk_includes_first_depth_first() {
        let frontend = MemoryFrontend::new()
            .with_unit(
                TranslationUnit::new("a.h")
                    .with_include("b.h")
                    .with_include("d.h")
                    .with_decl(decl("a")),
            )
            .with_unit(TranslationUnit::new("b.h").with_include("c.h").with_decl(decl("b")))
            .with_unit(TranslationUnit::new("c.h").with_decl(decl("c")))
            .with_unit(TranslationUnit::new("d.h").with_decl(decl("d")));

        let mut collector = Collector::builder().build();
        let root = collector.parse(&frontend, Path::new("a.h")).unwrap();
        let decls = collector.walk(&frontend, root).unwrap();

        assert_eq!(names(&decls), ["c", "b", "d", "a"]);
        assert_eq!(decls[0].translation_unit, PathBuf::from("c.h"));
        assert!(collector.is_visited(Path::new("d.h")));
    }

    #[test]
    fn test_walk_include_cycle_terminates() {
        let frontend = MemoryFrontend::new()
            .with_unit(TranslationUnit::new("a.h").with_include("b.h").with_decl(decl("a")))
            .with_unit(TranslationUnit::new("b.h").with_include("a.h").with_decl(decl("b")));

        let mut collector = Collector::builder().build();
        let root = collector.parse(&frontend, Path::new("a.h")).unwrap();
        let decls = collector.walk(&frontend, root).unwrap();

        assert_eq!(names(&decls), ["b", "a"]);
        assert_eq!(
            frontend.parsed_paths(),
            [PathBuf::from("a.h"), PathBuf::from("b.h")]
        );
    }

    #[test]
    fn test_walk_shared_include_parsed_once() {
        let frontend = MemoryFrontend::new()
            .with_unit(
                TranslationUnit::new("a.h")
                    .with_include("b.h")
                    .with_include("c.h")
                    .with_decl(decl("a")),
            )
            .with_unit(TranslationUnit::new("b.h").with_include("c.h").with_decl(decl("b")))
            .with_unit(TranslationUnit::new("c.h").with_decl(decl("c")));

        let mut collector = Collector::builder().build();
        let root = collector.parse(&frontend, Path::new("a.h")).unwrap();
        let decls = collector.walk(&frontend, root).unwrap();

        assert_eq!(names(&decls), ["c", "b", "a"]);
        assert_eq!(frontend.parsed_paths().len(), 3);
    }

    #[test]
    fn test_walk_of_visited_header_yields_nothing_new() {
        let frontend = MemoryFrontend::new()
            .with_unit(TranslationUnit::new("a.h").with_include("b.h").with_decl(decl("a")))
            .with_unit(TranslationUnit::new("b.h").with_decl(decl("b")));

        let mut collector = Collector::builder().build();
        let root = collector.parse(&frontend, Path::new("a.h")).unwrap();
        collector.walk(&frontend, root).unwrap();
        let again = collector.parse(&frontend, Path::new("b.h")).unwrap();
        let decls = collector.walk(&frontend, again).unwrap();

        assert!(decls.is_empty());
        assert_eq!(names(collector.walked_decls()), ["b", "a"]);
    }

    #[test]
    fn test_walk_skips_system_headers() {
        let frontend = MemoryFrontend::new()
            .with_unit(
                TranslationUnit::new("/src/symbol.h")
                    .with_include("/usr/include/c++/12/string")
                    .with_include("/src/basic.h")
                    .with_decl(decl("symbol")),
            )
            .with_unit(TranslationUnit::new("/src/basic.h").with_decl(decl("basic")));

        let mut collector = Collector::builder()
            .system_include_path("/usr/include")
            .build();
        let root = collector.parse(&frontend, Path::new("/src/symbol.h")).unwrap();
        let decls = collector.walk(&frontend, root).unwrap();

        assert_eq!(names(&decls), ["basic", "symbol"]);
        assert!(collector.should_skip(Path::new("/usr/include/c++/12/string")));
        assert!(!collector.is_visited(Path::new("/usr/include/c++/12/string")));
        // every parse got the include directory
        assert!(frontend
            .last_args()
            .unwrap()
            .contains(&"-I/usr/include".to_string()));
    }

    /// `a.h` including `b.h`; the frontend reports `b` inside `a.h`'s tree as well
    fn frontend_with_included_decl() -> MemoryFrontend {
        MemoryFrontend::new()
            .with_unit(
                TranslationUnit::new("a.h")
                    .with_include("b.h")
                    .with_decl(decl("b").with_from_include(true))
                    .with_decl(decl("a")),
            )
            .with_unit(TranslationUnit::new("b.h").with_decl(decl("b")))
    }

    #[test]
    fn test_walk_non_recursive_keeps_included_declarations() {
        let frontend = frontend_with_included_decl();

        let mut collector = Collector::builder().recursive(false).build();
        let root = collector.parse(&frontend, Path::new("a.h")).unwrap();
        let decls = collector.walk(&frontend, root).unwrap();

        assert_eq!(names(&decls), ["b", "a"]);
        assert_eq!(frontend.parsed_paths().len(), 1);
    }

    #[test]
    fn test_walk_recursive_takes_declarations_from_their_own_unit() {
        let frontend = frontend_with_included_decl();

        let mut collector = Collector::builder().build();
        let root = collector.parse(&frontend, Path::new("a.h")).unwrap();
        let decls = collector.walk(&frontend, root).unwrap();

        assert_eq!(names(&decls), ["b", "a"]);
        assert_eq!(decls[0].translation_unit, PathBuf::from("b.h"));
        assert_eq!(frontend.parsed_paths().len(), 2);
    }

    #[test]
    fn test_walk_cycle_through_other_spelling() {
        let frontend = MemoryFrontend::new()
            .with_unit(
                TranslationUnit::new("ginac/a.h")
                    .with_include("ginac/b.h")
                    .with_decl(decl("a")),
            )
            .with_unit(
                TranslationUnit::new("ginac/b.h")
                    .with_include("./ginac/a.h")
                    .with_decl(decl("b")),
            );

        let mut collector = Collector::builder().build();
        let root = collector.parse(&frontend, Path::new("ginac/a.h")).unwrap();
        let decls = collector.walk(&frontend, root).unwrap();

        assert_eq!(names(&decls), ["b", "a"]);
        assert_eq!(frontend.parsed_paths().len(), 2);
        assert!(collector.is_visited(Path::new("./ginac/b.h")));
    }

    #[test]
    fn test_visited_set_uses_canonical_paths() {
        let dir = tempfile::tempdir().unwrap();
        let header = dir.path().join("symbol.h");
        fs::write(&header, "class symbol {};\n").unwrap();
        let frontend = MemoryFrontend::new().with_unit(TranslationUnit::new(header.clone()));

        let mut collector = Collector::builder().build();
        let root = collector.parse(&frontend, &header).unwrap();
        collector.walk(&frontend, root).unwrap();

        let dir_name = dir.path().file_name().unwrap();
        let roundabout = dir.path().join("..").join(dir_name).join("symbol.h");
        assert!(collector.is_visited(&roundabout));
    }

    #[test]
    fn test_walk_missing_include_is_fatal() {
        let frontend = MemoryFrontend::new()
            .with_unit(TranslationUnit::new("a.h").with_include("gone.h"));

        let mut collector = Collector::builder().build();
        let root = collector.parse(&frontend, Path::new("a.h")).unwrap();
        let err = collector.walk(&frontend, root).unwrap_err();
        assert!(matches!(err, Error::Frontend { path, .. } if path.as_path() == Path::new("gone.h")));
    }

    #[test]
    fn test_find_or_create_type_is_idempotent() {
        let mut collector = Collector::builder().build();
        let ty = NativeType::record("symbol");

        let first = collector.find_or_create_type("symbol", &ty).unwrap() as *const ClassType;
        collector
            .find_or_create_type("symbol", &ty)
            .unwrap()
            .methods
            .push(method("get_name"));
        let second = collector.find_or_create_type("symbol", &ty).unwrap();
        second.methods.push(method("get_TeX_name"));
        assert!(std::ptr::eq(first, second));

        assert_eq!(collector.class_interfaces().count(), 1);
        let interface = collector.class_interface("Symbol").unwrap();
        assert_eq!(interface.class_type.native_name, "symbol");
        assert_eq!(interface.class_type.methods.len(), 2);
        assert!(interface.deps.is_empty());
    }

    #[test]
    fn test_find_or_create_type_rejects_collisions() {
        let mut collector = Collector::builder().build();
        collector
            .find_or_create_type("my_class", &NativeType::record("my_class"))
            .unwrap();
        let err = collector
            .find_or_create_type("MY_CLASS", &NativeType::record("MY_CLASS"))
            .unwrap_err();
        match err {
            Error::TargetNameCollision {
                target,
                existing,
                incoming,
            } => {
                assert_eq!(target, "MyClass");
                assert_eq!(existing, "my_class");
                assert_eq!(incoming, "MY_CLASS");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(collector.class_interfaces().count(), 1);
    }

    #[test]
    fn test_same_base_name_in_other_namespace_collides() {
        let mut collector = Collector::builder().build();
        collector
            .find_or_create_type("symbol", &NativeType::record("GiNaC::symbol"))
            .unwrap()
            .methods
            .push(method("f"));
        // the same class again is fine
        collector
            .find_or_create_type("symbol", &NativeType::record("GiNaC::symbol"))
            .unwrap();

        let err = collector
            .find_or_create_type("symbol", &NativeType::record("other::symbol"))
            .unwrap_err();
        assert!(matches!(
            err,
            Error::TargetNameCollision { ref target, ref existing, ref incoming }
                if target == "Symbol" && existing == "GiNaC::symbol" && incoming == "other::symbol"
        ));
        assert_eq!(collector.class_interface("Symbol").unwrap().class_type.methods.len(), 1);
    }
}
