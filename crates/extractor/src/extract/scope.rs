/// One function-like construct being traversed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub name: Option<String>,
}

/// Lexical stack of enclosing function-like constructs.
///
/// A frame is pushed for every function literal, named or not. Calls are
/// attributed to the innermost frame that carries a name.
#[derive(Debug, Default)]
pub struct ScopeStack {
    frames: Vec<Frame>,
}

impl ScopeStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: Option<String>) {
        self.frames.push(Frame { name });
    }

    pub fn pop(&mut self) -> Option<Frame> {
        self.frames.pop()
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// No enclosing function at all
    pub fn is_module_scope(&self) -> bool {
        self.frames.is_empty()
    }

    /// Innermost enclosing named function
    pub fn caller(&self) -> Option<&str> {
        self.frames.iter().rev().find_map(|f| f.name.as_deref())
    }

    /// Run `f` with a frame pushed, popping it afterwards
    pub fn within<R>(&mut self, name: Option<String>, f: impl FnOnce(&mut Self) -> R) -> R {
        self.push(name);
        let out = f(self);
        self.pop();
        out
    }
}
