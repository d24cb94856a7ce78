//! The macro table: definitions accumulated by `#define`, consulted by
//! macro expansion, mutated by `#undef`, and shared across an include chain
//! so that a macro defined in an included file is visible in the includer.

use armaclass_lex::Token;
use armaclass_util::FxHashMap;

/// `params: None` means object-like (`#define M x`); `Some(vec![])` means a
/// function-like macro declared with zero parameters (`#define M() x`),
/// which only expands when invoked as `M()`, not as the bare word `M`.
#[derive(Clone, Debug)]
pub struct MacroDefinition {
    pub name: String,
    pub params: Option<Vec<String>>,
    pub body: Vec<Token>,
}

impl MacroDefinition {
    pub fn is_function_like(&self) -> bool {
        self.params.is_some()
    }
}

#[derive(Default)]
pub struct MacroTable {
    defines: FxHashMap<String, MacroDefinition>,
}

impl MacroTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&MacroDefinition> {
        self.defines.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.defines.contains_key(name)
    }

    /// Inserts or overwrites a definition. Returns `true` if a
    /// pre-existing definition was overwritten (the caller reports this as
    /// a redefinition warning).
    pub fn define(&mut self, def: MacroDefinition) -> bool {
        self.defines.insert(def.name.clone(), def).is_some()
    }

    /// Removes a definition. Returns `true` if it existed (the caller
    /// reports a missing definition as an "undefining unknown macro"
    /// warning when this is `false`).
    pub fn undefine(&mut self, name: &str) -> bool {
        self.defines.remove(name).is_some()
    }

    /// Binds a temporary object-like macro (a function-like macro's
    /// parameter, bound to its argument tokens for the duration of one
    /// expansion) and returns the previous definition, if any, so the
    /// caller can restore it afterward.
    pub fn bind_temporary(&mut self, name: &str, body: Vec<Token>) -> Option<MacroDefinition> {
        self.defines.insert(
            name.to_string(),
            MacroDefinition {
                name: name.to_string(),
                params: None,
                body,
            },
        )
    }

    /// Removes `name` outright, returning the prior definition so the
    /// caller can restore it. Used to exclude a macro from its own table
    /// while its body is being expanded, preventing infinite recursion on
    /// direct or indirect self-reference.
    pub fn exclude(&mut self, name: &str) -> Option<MacroDefinition> {
        self.defines.remove(name)
    }

    pub fn restore(&mut self, name: &str, previous: Option<MacroDefinition>) {
        match previous {
            Some(def) => {
                self.defines.insert(name.to_string(), def);
            }
            None => {
                self.defines.remove(name);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use armaclass_lex::TokenKind;
    use armaclass_util::span::Span;

    fn word(text: &str) -> Token {
        Token::new(TokenKind::Word, text, Span::DUMMY)
    }

    #[test]
    fn define_reports_redefinition() {
        let mut table = MacroTable::new();
        assert!(!table.define(MacroDefinition {
            name: "TEST".into(),
            params: None,
            body: vec![word("x")],
        }));
        assert!(table.define(MacroDefinition {
            name: "TEST".into(),
            params: None,
            body: vec![word("y")],
        }));
    }

    #[test]
    fn undefine_reports_missing() {
        let mut table = MacroTable::new();
        assert!(!table.undefine("NOPE"));
    }

    #[test]
    fn exclude_then_restore_roundtrips() {
        let mut table = MacroTable::new();
        table.define(MacroDefinition {
            name: "M".into(),
            params: None,
            body: vec![word("body")],
        });
        let saved = table.exclude("M");
        assert!(!table.contains("M"));
        table.restore("M", saved);
        assert!(table.contains("M"));
    }

    #[test]
    fn function_like_distinguished_from_object_like() {
        let object_like = MacroDefinition {
            name: "A".into(),
            params: None,
            body: vec![],
        };
        let function_like_zero_arg = MacroDefinition {
            name: "B".into(),
            params: Some(vec![]),
            body: vec![],
        };
        assert!(!object_like.is_function_like());
        assert!(function_like_zero_arg.is_function_like());
    }
}
