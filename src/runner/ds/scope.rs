use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use crate::parser::ast::{FunctionData, VariableDeclarationKind};
use crate::runner::ds::error::JErrorType;
use crate::runner::ds::operations::type_conversion::get_type;
use crate::runner::ds::value::JsValue;

pub type ScopeId = usize;

pub const GLOBAL_SCOPE_ID: ScopeId = 0;

lazy_static! {
    static ref RESERVED_WORDS: HashSet<&'static str> = [
        "break", "case", "catch", "class", "const", "continue", "debugger", "default", "delete",
        "do", "else", "export", "extends", "finally", "for", "function", "if", "import", "in",
        "instanceof", "new", "return", "super", "switch", "this", "throw", "try", "typeof", "var",
        "void", "while", "with", "yield", "true", "false", "null", "let",
    ]
    .iter()
    .cloned()
    .collect();
}

pub fn is_reserved_word(name: &str) -> bool {
    RESERVED_WORDS.contains(name)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    Global,
    /// One per active call. Writes never travel past it.
    Function,
    Block,
}

impl ScopeKind {
    fn is_frame(self) -> bool {
        matches!(self, ScopeKind::Global | ScopeKind::Function)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingKind {
    Var,
    Let,
    Const,
    Function,
}

impl BindingKind {
    fn is_lexical(self) -> bool {
        matches!(self, BindingKind::Let | BindingKind::Const)
    }
}

impl From<VariableDeclarationKind> for BindingKind {
    fn from(kind: VariableDeclarationKind) -> Self {
        match kind {
            VariableDeclarationKind::Var => BindingKind::Var,
            VariableDeclarationKind::Let => BindingKind::Let,
            VariableDeclarationKind::Const => BindingKind::Const,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Binding {
    pub kind: BindingKind,
    pub value: JsValue,
    /// Present only for `BindingKind::Function`.
    pub function: Option<Rc<FunctionData>>,
}

impl Binding {
    pub fn type_tag(&self) -> &'static str {
        get_type(&self.value)
    }
}

#[derive(Debug)]
struct Scope {
    kind: ScopeKind,
    parent: Option<ScopeId>,
    bindings: HashMap<String, Binding>,
    /// Names removed from this frame's view of outer scopes.
    removed: HashSet<String>,
}

impl Scope {
    fn new(kind: ScopeKind, parent: Option<ScopeId>) -> Self {
        Scope {
            kind,
            parent,
            bindings: HashMap::new(),
            removed: HashSet::new(),
        }
    }
}

/// The scope chain, kept as a stack-shaped arena.
///
/// A call pushes a `Function` scope whose parent is the caller's current
/// scope, so the callee reads everything the caller could see at the call
/// site. Anything it writes to a name living beyond its own frame is first
/// copied into the frame; popping the frame therefore discards every effect
/// the call had on the caller's bindings.
#[derive(Debug)]
pub struct Environment {
    scopes: Vec<Scope>,
    current: ScopeId,
}

impl Environment {
    pub fn new() -> Self {
        Environment {
            scopes: vec![Scope::new(ScopeKind::Global, None)],
            current: GLOBAL_SCOPE_ID,
        }
    }

    pub fn current_scope(&self) -> ScopeId {
        self.current
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    pub fn push_scope(&mut self, kind: ScopeKind) -> ScopeId {
        let id = self.scopes.len();
        self.scopes.push(Scope::new(kind, Some(self.current)));
        self.current = id;
        id
    }

    /// Makes `id` current again, dropping every scope pushed after it.
    pub fn unwind_to(&mut self, id: ScopeId) {
        self.scopes.truncate(id + 1);
        self.current = id;
    }

    fn frame_scope(&self) -> ScopeId {
        let mut id = self.current;
        loop {
            let scope = &self.scopes[id];
            match scope.parent {
                Some(parent) if !scope.kind.is_frame() => id = parent,
                _ => return id,
            }
        }
    }

    /// Finds the scope holding `name` and whether it is inside the current
    /// frame (and so writable in place).
    fn locate(&self, name: &str) -> Option<(ScopeId, bool)> {
        let mut next = Some(self.current);
        let mut in_frame = true;
        while let Some(id) = next {
            let scope = &self.scopes[id];
            if scope.bindings.contains_key(name) {
                return Some((id, in_frame));
            }
            if scope.removed.contains(name) {
                return None;
            }
            if scope.kind.is_frame() {
                in_frame = false;
            }
            next = scope.parent;
        }
        None
    }

    pub fn exists(&self, name: &str) -> bool {
        self.locate(name).is_some()
    }

    pub fn get_binding(&self, name: &str) -> Result<&Binding, JErrorType> {
        match self.locate(name) {
            Some((id, _)) => self.scopes[id]
                .bindings
                .get(name)
                .ok_or_else(|| JErrorType::ReferenceError(name.to_string())),
            None => Err(JErrorType::ReferenceError(name.to_string())),
        }
    }

    pub fn lookup(&self, name: &str) -> Result<JsValue, JErrorType> {
        Ok(self.get_binding(name)?.value.clone())
    }

    /// `let`/`const` land in the innermost scope, `var` and functions in the
    /// nearest frame.
    pub fn declare(
        &mut self,
        name: &str,
        kind: BindingKind,
        value: JsValue,
        function: Option<Rc<FunctionData>>,
    ) -> Result<(), JErrorType> {
        check_identifier(name)?;
        let target = if kind.is_lexical() {
            self.current
        } else {
            self.frame_scope()
        };
        let scope = &mut self.scopes[target];
        if let Some(existing) = scope.bindings.get(name) {
            if existing.kind.is_lexical() || kind.is_lexical() {
                return Err(JErrorType::IdentifierAlreadyDeclared(name.to_string()));
            }
        }
        scope.removed.remove(name);
        scope.bindings.insert(
            name.to_string(),
            Binding {
                kind,
                value,
                function,
            },
        );
        Ok(())
    }

    pub fn assign(&mut self, name: &str, value: JsValue) -> Result<(), JErrorType> {
        self.update_with(name, |v| {
            *v = value;
            Ok(())
        })
    }

    /// Applies `f` to the value bound to `name`, copying the binding into the
    /// current frame first when it lives outside it.
    pub fn update_with<R, F>(&mut self, name: &str, f: F) -> Result<R, JErrorType>
    where
        F: FnOnce(&mut JsValue) -> Result<R, JErrorType>,
    {
        check_identifier(name)?;
        let (id, in_frame) = self
            .locate(name)
            .ok_or_else(|| JErrorType::ReferenceError(name.to_string()))?;
        let found = self.scopes[id]
            .bindings
            .get(name)
            .ok_or_else(|| JErrorType::ReferenceError(name.to_string()))?;
        if found.kind == BindingKind::Const {
            return Err(JErrorType::ConstAssignmentError(name.to_string()));
        }
        let target = if in_frame { id } else { self.frame_scope() };
        if !in_frame {
            let shadow = found.clone();
            self.scopes[target].bindings.insert(name.to_string(), shadow);
        }
        let binding = self.scopes[target]
            .bindings
            .get_mut(name)
            .ok_or_else(|| JErrorType::ReferenceError(name.to_string()))?;
        let result = f(&mut binding.value)?;
        if binding.kind == BindingKind::Function {
            binding.kind = BindingKind::Var;
            binding.function = None;
        }
        Ok(result)
    }

    pub fn remove(&mut self, name: &str) -> Result<(), JErrorType> {
        let (id, in_frame) = self
            .locate(name)
            .ok_or_else(|| JErrorType::ReferenceError(name.to_string()))?;
        if in_frame {
            self.scopes[id].bindings.remove(name);
        } else {
            let frame = self.frame_scope();
            self.scopes[frame].removed.insert(name.to_string());
        }
        Ok(())
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

/// Fails with `ReservedWordAsIdentifier` when `name` cannot be bound.
pub fn check_identifier(name: &str) -> Result<(), JErrorType> {
    if is_reserved_word(name) {
        Err(JErrorType::ReservedWordAsIdentifier(name.to_string()))
    } else {
        Ok(())
    }
}
