//! Loader/execution engine.
//!
//! Concatenates the surviving code cells into one Lua chunk, compiles it,
//! runs it against a fresh environment table, and registers the populated
//! environment as a named module.
//!
//! The environment's metatable falls back to the Lua globals for reads, so
//! notebook code can call `print`, `string`, and friends, while every write
//! lands in the module table. Each load allocates its own environment; no
//! state crosses imports.

use mlua::{FromLua, FromLuaMulti, Function, IntoLuaMulti, Lua, Table, Value};
use rustc_hash::FxHashMap;

use crate::error::{Error, Result};
use crate::notebook::Notebook;

/// Unit name used when the caller does not pick one.
pub const DEFAULT_MODULE_NAME: &str = "notebook_module";

/// Handle over an executed notebook's environment table.
#[derive(Debug, Clone)]
pub struct Module {
    name: String,
    env: Table,
}

impl Module {
    /// Name the module was registered under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fetch a top-level binding, converted to `T`.
    pub fn get<T: FromLua>(&self, name: &str) -> Result<T> {
        Ok(self.env.get(name)?)
    }

    /// Whether the module defines the given top-level name.
    pub fn contains(&self, name: &str) -> Result<bool> {
        Ok(self.env.contains_key(name)?)
    }

    /// Top-level names defined by the module, sorted.
    pub fn names(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for pair in self.env.pairs::<Value, Value>() {
            let (key, _) = pair?;
            if let Value::String(s) = key {
                names.push(s.to_str()?.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    /// Call a function defined by the module.
    pub fn call<R: FromLuaMulti>(&self, name: &str, args: impl IntoLuaMulti) -> Result<R> {
        let func: Function = self.env.get(name)?;
        func.call(args).map_err(|e| Error::Execution {
            unit: self.name.clone(),
            source: e,
        })
    }

    /// The raw environment table.
    pub fn env(&self) -> &Table {
        &self.env
    }
}

/// Named store of imported modules. Last writer wins per name; entries are
/// never removed automatically. No internal locking.
#[derive(Debug, Default)]
pub struct ModuleRegistry {
    modules: FxHashMap<String, Module>,
}

impl ModuleRegistry {
    /// Register a module under its name, returning any displaced entry.
    pub fn insert(&mut self, module: Module) -> Option<Module> {
        self.modules.insert(module.name.clone(), module)
    }

    /// Look up a previously imported module.
    pub fn get(&self, name: &str) -> Option<&Module> {
        self.modules.get(name)
    }

    /// Whether a module is registered under the name.
    pub fn contains(&self, name: &str) -> bool {
        self.modules.contains_key(name)
    }

    /// Registered module names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.modules.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

/// Owns the Lua VM and the module registry.
pub struct Loader {
    lua: Lua,
    registry: ModuleRegistry,
}

impl Loader {
    /// Create a loader with a fresh VM and an empty registry.
    pub fn new() -> Self {
        Self {
            lua: Lua::new(),
            registry: ModuleRegistry::default(),
        }
    }

    /// The underlying Lua VM.
    pub fn lua(&self) -> &Lua {
        &self.lua
    }

    /// The module registry.
    pub fn registry(&self) -> &ModuleRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut ModuleRegistry {
        &mut self.registry
    }

    /// Execute the notebook's code cells as one chunk and register the
    /// resulting environment under `unit_name`.
    ///
    /// Compile faults surface as [`Error::Compile`] with a line in the
    /// combined chunk (not remapped to cells); runtime faults as
    /// [`Error::Execution`]. Nothing is registered on failure.
    pub fn load(&mut self, notebook: &Notebook, unit_name: &str) -> Result<Module> {
        let chunk = combined_source(notebook);
        tracing::debug!(
            unit = unit_name,
            cells = notebook.code_cells().count(),
            bytes = chunk.len(),
            "compiling combined notebook source"
        );

        let env = self.lua.create_table()?;
        let meta = self.lua.create_table()?;
        meta.set("__index", self.lua.globals())?;
        env.set_metatable(Some(meta));

        let func = self
            .lua
            .load(&chunk)
            .set_name(unit_name)
            .set_environment(env.clone())
            .into_function()
            .map_err(|e| match e {
                mlua::Error::SyntaxError { message, .. } => {
                    tracing::error!(unit = unit_name, "syntax error in notebook code: {message}");
                    Error::Compile {
                        unit: unit_name.to_string(),
                        line: chunk_error_line(&message),
                        message,
                    }
                }
                other => Error::Lua(other),
            })?;

        func.call::<()>(()).map_err(|e| {
            tracing::error!(unit = unit_name, "error while executing notebook code: {e}");
            Error::Execution {
                unit: unit_name.to_string(),
                source: e,
            }
        })?;

        let module = Module {
            name: unit_name.to_string(),
            env,
        };
        self.registry.insert(module.clone());
        tracing::info!(unit = unit_name, "imported notebook as module");
        Ok(module)
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Concatenate code-cell sources in document order: lines within a cell are
/// joined as-is, cells are joined by a single newline. Cell order defines
/// execution order, so a later cell redefining a name wins.
pub fn combined_source(notebook: &Notebook) -> String {
    let sources: Vec<String> = notebook
        .code_cells()
        .map(|c| c.source.text().into_owned())
        .collect();
    sources.join("\n")
}

/// Pull the `:<line>:` component out of a Lua error message. The chunk name
/// is echoed as `[string "..."]` ahead of the position, so scanning starts
/// after it; a `:N:` inside a caller-chosen unit name is not a line number.
fn chunk_error_line(message: &str) -> Option<u32> {
    let start = message.find("\"]:").map_or(0, |i| i + 2);
    let bytes = message.as_bytes();
    let mut i = start;
    while i < bytes.len() {
        if bytes[i] == b':' {
            let mut j = i + 1;
            while j < bytes.len() && bytes[j].is_ascii_digit() {
                j += 1;
            }
            if j > i + 1 && bytes.get(j) == Some(&b':') {
                return message[i + 1..j].parse().ok();
            }
            i = j;
        } else {
            i += 1;
        }
    }
    None
}
