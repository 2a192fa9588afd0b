//! Module discovery and per-file parsing.
//!
//! A module is a directory of `.vela` files (a single file is accepted as
//! a degenerate module for tests and tooling). All files of a module parse
//! into one entity with one symbol table; the entity is named by its index
//! in the import list, `$module-<i>`. The import list grows while modules
//! parse, and the outer loop in [`crate::parse`] follows it to a fixed
//! point.

use vela_diagnostic::{Diagnostic, ErrorCode};
use vela_ir::{Entity, Loc, NodeId, NodeKind, TokenTag};

use crate::outcome::Parsed;
use crate::recovery::MODULE_ITEM_START;
use crate::{paths, Parser};

/// Extension of Vela source files.
pub(crate) const EXT: &str = "vela";

impl Parser<'_> {
    /// Create the entity for module `index` and register it with the
    /// program. The current scope must be the program root.
    pub(crate) fn module_shell(&mut self, index: usize, program: NodeId) -> NodeId {
        let name = self.interner.intern_owned(format!("$module-{index}"));
        let module = self
            .arena
            .alloc(Loc::DUMMY, NodeKind::Class(Entity::new(name)));
        self.set_sym(name, module);
        self.entity_mut(program).members.push(module);
        module
    }

    /// Load one module: discover its files and parse each into the shared
    /// module entity.
    pub(crate) fn load_module(&mut self, path: &str, index: usize, program: NodeId) {
        let name = self.interner.intern_owned(format!("$module-{index}"));
        let already_loaded = self
            .arena
            .symbols(program)
            .and_then(|table| table.get(name))
            .is_some();
        if already_loaded {
            return;
        }

        tracing::debug!(index, path, "loading module");
        let module = self.module_shell(index, program);
        let mut moduledef = None;

        self.in_scope(module, |p| {
            if !paths::is_directory(path) {
                // A plain file is a one-file module; this is the testing
                // hook.
                p.source_file(path, module, &mut moduledef);
            } else {
                let mut count = 0;
                for file in paths::files(path) {
                    if paths::extension(&file) != EXT {
                        continue;
                    }
                    count += 1;
                    let filename = paths::join(path, &file);
                    p.source_file(&filename, module, &mut moduledef);
                }
                if count == 0 {
                    p.error(Diagnostic::error(
                        ErrorCode::E0002,
                        format!("no {EXT} files found in {path}"),
                    ));
                }
            }
        });

        self.apply_moduledef(module, moduledef);
    }

    /// Fold a `module ...;` directive into the module's root entity.
    pub(crate) fn apply_moduledef(&mut self, module: NodeId, moduledef: Option<NodeId>) {
        let Some(def) = moduledef else {
            return;
        };
        let (typeparams, inherits) = match &self.arena.get(def).kind {
            NodeKind::Module {
                typeparams,
                inherits,
            } => (typeparams.clone(), *inherits),
            _ => return,
        };
        let entity = self.entity_mut(module);
        entity.typeparams.extend(typeparams);
        entity.inherits = inherits;
    }

    /// Read and parse one source file into the module entity.
    fn source_file(&mut self, file: &str, module: NodeId, moduledef: &mut Option<NodeId>) {
        let text = match std::fs::read_to_string(file) {
            Ok(text) => text,
            Err(err) => {
                self.error(
                    Diagnostic::error(ErrorCode::E0001, format!("couldn't read file `{file}`"))
                        .with_help(err.to_string()),
                );
                return;
            }
        };

        tracing::debug!(file, bytes = text.len(), "parsing source file");
        let source = self.sources.add(file, paths::to_directory(file), &text);
        self.stream.start(source);
        self.parse_module_items(module, moduledef);
    }

    /// file := (moduledef | member)*
    pub(crate) fn parse_module_items(
        &mut self,
        module: NodeId,
        moduledef: &mut Option<NodeId>,
    ) {
        while !self.has(TokenTag::End) {
            let mut matched = false;

            match self.opt_moduledef(moduledef) {
                Parsed::Skip => {}
                _ => matched = true,
            }

            if !matched {
                match self.opt_member() {
                    Parsed::Skip => {}
                    outcome => {
                        matched = true;
                        if let Some(member) = outcome.node() {
                            self.entity_mut(module).members.push(member);
                        }
                    }
                }
            }

            if !matched {
                let at = self.stream.loc();
                self.error(
                    Diagnostic::error(
                        ErrorCode::E1005,
                        "expected a module, class, interface, type alias, field, or function",
                    )
                    .at(at),
                );
                self.stream.restart_before(MODULE_ITEM_START);
            }
        }
    }
}
