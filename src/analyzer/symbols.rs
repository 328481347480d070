// src/analyzer/symbols.rs

use crate::utils::Span;
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// 作用域在符号表中的编号。全局作用域总是 0。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId(usize);

impl ScopeId {
    pub const GLOBAL: ScopeId = ScopeId(0);

    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolId(usize);

/// 已声明名字的种类。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    Variable,
    Constant,
    Function,
    Class,
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SymbolKind::Variable => "variable",
            SymbolKind::Constant => "constant",
            SymbolKind::Function => "function",
            SymbolKind::Class => "class",
        };
        write!(f, "{}", s)
    }
}

/// 打开作用域的语法结构。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeKind {
    Global,
    Function,
    Class,
    Block,
    Loop,
    Conditional,
}

/// 符号表中存储的符号信息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub name: String,
    pub kind: SymbolKind,
    pub scope: ScopeId,
    pub declared_at_line: usize,
    /// 声明处名字的位置
    pub span: Span,
}

/// 一个作用域：父作用域的链接加上本作用域内的名字。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scope {
    id: ScopeId,
    parent: Option<ScopeId>,
    kind: ScopeKind,
    names: HashMap<String, SymbolId>,
}

impl Scope {
    pub fn id(&self) -> ScopeId {
        self.id
    }

    pub fn parent(&self) -> Option<ScopeId> {
        self.parent
    }

    pub fn kind(&self) -> ScopeKind {
        self.kind
    }

    pub fn get(&self, name: &str) -> Option<SymbolId> {
        self.names.get(name).copied()
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SymbolError {
    #[error("'{name}' is already declared in this scope (first declared on line {previous_line})")]
    AlreadyDeclared {
        name: String,
        previous: SymbolId,
        previous_line: usize,
    },
}

/// 符号表：一棵作用域树。
///
/// 退出的作用域不会被丢弃，分析结束后整棵树仍可供调用者查看；
/// `current` 只是指向树中当前所在的节点。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolTable {
    symbols: Vec<Symbol>,
    scopes: Vec<Scope>,
    current: ScopeId,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolTable {
    /// 创建一个新的符号表，并自动进入全局作用域
    pub fn new() -> Self {
        Self {
            symbols: Vec::new(),
            scopes: vec![Scope {
                id: ScopeId::GLOBAL,
                parent: None,
                kind: ScopeKind::Global,
                names: HashMap::new(),
            }],
            current: ScopeId::GLOBAL,
        }
    }

    /// 进入一个新的嵌套作用域（例如函数体或代码块），返回它的编号
    pub fn enter_scope(&mut self, kind: ScopeKind) -> ScopeId {
        let id = ScopeId(self.scopes.len());
        self.scopes.push(Scope {
            id,
            parent: Some(self.current),
            kind,
            names: HashMap::new(),
        });
        tracing::trace!(scope = id.0, parent = self.current.0, ?kind, "enter scope");
        self.current = id;
        id
    }

    /// 回到父作用域。已经在全局作用域时什么也不做。
    pub fn exit_scope(&mut self) {
        if let Some(parent) = self.scopes[self.current.0].parent {
            tracing::trace!(scope = self.current.0, "exit scope");
            self.current = parent;
        }
    }

    pub fn current_scope(&self) -> ScopeId {
        self.current
    }

    /// 在当前作用域中声明一个名字。
    ///
    /// 同一作用域内名字唯一：重复声明返回 `AlreadyDeclared`，原有的符号保持不变。
    pub fn declare(
        &mut self,
        name: &str,
        kind: SymbolKind,
        line: usize,
        span: Span,
    ) -> Result<SymbolId, SymbolError> {
        let scope = &mut self.scopes[self.current.0];
        if let Some(previous) = scope.names.get(name).copied() {
            return Err(SymbolError::AlreadyDeclared {
                name: name.to_string(),
                previous,
                previous_line: self.symbols[previous.0].declared_at_line,
            });
        }

        let id = SymbolId(self.symbols.len());
        scope.names.insert(name.to_string(), id);
        self.symbols.push(Symbol {
            name: name.to_string(),
            kind,
            scope: self.current,
            declared_at_line: line,
            span,
        });
        tracing::trace!(name, %kind, scope = self.current.0, line, "declare");
        Ok(id)
    }

    /// 查找一个符号（从当前作用域沿父链向外）
    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        let mut scope = Some(self.current);
        while let Some(id) = scope {
            let current = &self.scopes[id.0];
            if let Some(symbol) = current.get(name) {
                return Some(&self.symbols[symbol.0]);
            }
            scope = current.parent;
        }
        None
    }

    pub fn symbol(&self, id: SymbolId) -> &Symbol {
        &self.symbols[id.0]
    }

    /// 按声明顺序排列的全部符号。
    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.0]
    }

    pub fn scopes(&self) -> &[Scope] {
        &self.scopes
    }

    /// 某个作用域内直接声明的符号，按声明顺序。
    pub fn symbols_in(&self, scope: ScopeId) -> impl Iterator<Item = &Symbol> + '_ {
        self.symbols.iter().filter(move |symbol| symbol.scope == scope)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}
