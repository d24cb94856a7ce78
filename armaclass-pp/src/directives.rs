//! Phase D: `#define`/`#undef`, conditional compilation, and macro
//! expansion (including function-like arguments, `##` paste-at-definition
//! and `#` stringification).
//!
//! This is a single forward scan that recurses into itself in two places:
//! to process a taken `#ifdef`/`#ifndef` branch's own nested conditionals,
//! and to expand a macro body (which may itself reference other macros).
//! Both recursions share the same [`MacroTable`] and [`Handler`] as the
//! outer scan — see the Design Notes on shared mutable state.

use armaclass_lex::{Token, TokenKind};
use armaclass_util::diagnostic::Handler;
use armaclass_util::Error;

use crate::buffer::TokenBuffer;
use crate::macros::{MacroDefinition, MacroTable};

/// Bounds include *and* macro-expansion nesting together (the two
/// recursions that can drive the stack deep on adversarial input).
pub const MAX_EXPANSION_DEPTH: usize = 256;

pub struct PdContext<'a> {
    pub macros: &'a mut MacroTable,
    pub handler: &'a Handler,
    pub file_label: &'a str,
}

pub fn process_directives(buf: &mut TokenBuffer, ctx: &mut PdContext, depth: usize) -> Result<(), Error> {
    while buf.has_current() {
        match buf.current_kind().unwrap() {
            TokenKind::KeywordIfdef | TokenKind::KeywordIfndef => {
                process_conditional(buf, ctx, depth)?;
            }
            _ => process_one(buf, ctx, depth)?,
        }
    }
    Ok(())
}

fn process_one(buf: &mut TokenBuffer, ctx: &mut PdContext, depth: usize) -> Result<(), Error> {
    match buf.current_kind() {
        Some(TokenKind::KeywordDefine) => parse_define(buf, ctx),
        Some(TokenKind::KeywordUndef) => parse_undef(buf, ctx),
        Some(TokenKind::Word) if ctx.macros.contains(&buf.current().unwrap().text) => {
            expand_macro(buf, ctx, depth)
        }
        _ => {
            buf.advance();
            Ok(())
        }
    }
}

/// Deletes tokens from the current position through (and including) the
/// next `NEWLINE`, or through end of stream if none remains.
fn delete_through_newline(buf: &mut TokenBuffer) {
    let start = buf.index;
    let mut end = start;
    while end < buf.tokens.len() && buf.tokens[end].kind != TokenKind::Newline {
        end += 1;
    }
    if end < buf.tokens.len() {
        end += 1; // include the newline itself
    }
    buf.delete_range(start, end);
}

fn parse_define(buf: &mut TokenBuffer, ctx: &mut PdContext) -> Result<(), Error> {
    let start = buf.index;
    buf.expect(TokenKind::KeywordDefine, ctx.file_label)?;
    buf.advance();
    buf.expect_one_of(&[TokenKind::Whitespace, TokenKind::Tab], ctx.file_label)?;
    buf.skip_whitespace(false);
    let name_tok = buf.expect(TokenKind::Word, ctx.file_label)?.clone();
    let name = name_tok.text.clone();
    buf.advance();

    let params = if buf.current_kind() == Some(TokenKind::LRound) {
        buf.advance();
        Some(parse_param_list(buf, ctx.file_label)?)
    } else {
        None
    };

    buf.skip_whitespace(false);

    let mut body = Vec::new();
    while let Some(kind) = buf.current_kind() {
        if kind == TokenKind::Newline {
            break;
        }
        if kind != TokenKind::DoubleHash {
            body.push(buf.current().unwrap().clone());
        }
        buf.advance();
    }

    let redefined = ctx.macros.define(MacroDefinition { name: name.clone(), params, body });
    if redefined {
        ctx.handler.warn(format!("macro {name} redefined"), name_tok.span);
    }

    buf.index = start;
    delete_through_newline(buf);
    Ok(())
}

fn parse_param_list(buf: &mut TokenBuffer, file_label: &str) -> Result<Vec<String>, Error> {
    let mut names = Vec::new();
    buf.skip_whitespace(false);
    if buf.current_kind() == Some(TokenKind::RRound) {
        buf.advance();
        return Ok(names);
    }
    loop {
        buf.skip_whitespace(false);
        let name = buf.expect(TokenKind::Word, file_label)?.text.clone();
        names.push(name);
        buf.advance();
        buf.skip_whitespace(false);
        match buf.current_kind() {
            Some(TokenKind::Comma) => {
                buf.advance();
            }
            Some(TokenKind::RRound) => {
                buf.advance();
                break;
            }
            _ => {
                return Err(Error::preprocess(
                    "expected ',' or ')' in macro parameter list",
                    file_label,
                    buf.current().map(|t| t.span).unwrap_or_default(),
                ))
            }
        }
    }
    Ok(names)
}

fn parse_undef(buf: &mut TokenBuffer, ctx: &mut PdContext) -> Result<(), Error> {
    let start = buf.index;
    buf.expect(TokenKind::KeywordUndef, ctx.file_label)?;
    let directive_span = buf.current().unwrap().span;
    buf.advance();
    buf.expect_one_of(&[TokenKind::Whitespace, TokenKind::Tab], ctx.file_label)?;
    buf.skip_whitespace(false);
    let name = buf.expect(TokenKind::Word, ctx.file_label)?.text.clone();
    buf.advance();

    let existed = ctx.macros.undefine(&name);
    if !existed {
        ctx.handler
            .warn(format!("macro {name} was not previously defined"), directive_span);
    }

    buf.index = start;
    delete_through_newline(buf);
    Ok(())
}

fn process_conditional(buf: &mut TokenBuffer, ctx: &mut PdContext, depth: usize) -> Result<(), Error> {
    let start = buf.index;
    let is_ifdef = buf.current_kind() == Some(TokenKind::KeywordIfdef);
    buf.advance();
    buf.expect_one_of(&[TokenKind::Whitespace, TokenKind::Tab], ctx.file_label)?;
    buf.skip_whitespace(false);
    let name = buf.expect(TokenKind::Word, ctx.file_label)?.text.clone();
    buf.advance();

    buf.index = start;
    delete_through_newline(buf);

    let condition = if is_ifdef {
        ctx.macros.contains(&name)
    } else {
        !ctx.macros.contains(&name)
    };

    if condition {
        run_active_branch(buf, ctx, depth)
    } else {
        run_skip_branch(buf, ctx, depth, true)
    }
}

fn run_active_branch(buf: &mut TokenBuffer, ctx: &mut PdContext, depth: usize) -> Result<(), Error> {
    loop {
        match buf.current_kind() {
            None => {
                return Err(Error::missing_token(
                    "#endif",
                    Some("#ifdef/#ifndef".to_string()),
                ))
            }
            Some(TokenKind::KeywordElse) => {
                delete_through_newline(buf);
                return run_skip_branch(buf, ctx, depth, false);
            }
            Some(TokenKind::KeywordEndif) => {
                delete_through_newline(buf);
                return Ok(());
            }
            Some(TokenKind::KeywordIfdef) | Some(TokenKind::KeywordIfndef) => {
                process_conditional(buf, ctx, depth)?;
            }
            _ => process_one(buf, ctx, depth)?,
        }
    }
}

/// `on_else_take_active`: when this level's own `#else` is reached, should
/// control switch to processing the else-branch (`true`, used when the
/// overall condition was false) or continue skipping to `#endif` (`false`,
/// used after an active then-branch has already run and its `#else`
/// introduces a branch that must now be discarded)?
fn run_skip_branch(
    buf: &mut TokenBuffer,
    ctx: &mut PdContext,
    depth: usize,
    on_else_take_active: bool,
) -> Result<(), Error> {
    let mut nested = 0u32;
    loop {
        match buf.current_kind() {
            None => {
                return Err(Error::missing_token(
                    "#endif",
                    Some("#ifdef/#ifndef".to_string()),
                ))
            }
            Some(TokenKind::KeywordIfdef) | Some(TokenKind::KeywordIfndef) => {
                nested += 1;
                buf.delete_range(buf.index, buf.index + 1);
            }
            Some(TokenKind::KeywordEndif) if nested > 0 => {
                nested -= 1;
                buf.delete_range(buf.index, buf.index + 1);
            }
            Some(TokenKind::KeywordEndif) => {
                delete_through_newline(buf);
                return Ok(());
            }
            Some(TokenKind::KeywordElse) if nested > 0 => {
                buf.delete_range(buf.index, buf.index + 1);
            }
            Some(TokenKind::KeywordElse) => {
                delete_through_newline(buf);
                if on_else_take_active {
                    return run_active_branch(buf, ctx, depth);
                }
                return run_skip_branch(buf, ctx, depth, false);
            }
            _ => {
                buf.delete_range(buf.index, buf.index + 1);
            }
        }
    }
}

fn expand_macro(buf: &mut TokenBuffer, ctx: &mut PdContext, depth: usize) -> Result<(), Error> {
    if depth > MAX_EXPANSION_DEPTH {
        return Err(Error::preprocess(
            "recursion limit exceeded while expanding macro",
            ctx.file_label,
            buf.current().map(|t| t.span).unwrap_or_default(),
        ));
    }

    let start = buf.index;
    let name = buf.tokens[start].text.clone();
    let def = ctx
        .macros
        .get(&name)
        .cloned()
        .expect("caller checked macros.contains before dispatching");

    match def.params.clone() {
        Some(params) => expand_function_like(buf, ctx, depth, start, &name, &def, params),
        None => expand_object_like(buf, ctx, depth, start, &name, &def),
    }
}

fn expand_object_like(
    buf: &mut TokenBuffer,
    ctx: &mut PdContext,
    depth: usize,
    start: usize,
    name: &str,
    def: &MacroDefinition,
) -> Result<(), Error> {
    let stringify = start > 0 && buf.tokens[start - 1].kind == TokenKind::Hash;

    let saved = ctx.macros.exclude(name);
    let mut body_buf = TokenBuffer::new(def.body.clone());
    let result = process_directives(&mut body_buf, ctx, depth + 1);
    ctx.macros.restore(name, saved);
    result?;
    let mut expansion = body_buf.tokens;

    if stringify {
        let span = buf.tokens[start].span;
        let mut wrapped = Vec::with_capacity(expansion.len() + 2);
        wrapped.push(Token::canonical(TokenKind::DoubleQuotes, span));
        wrapped.append(&mut expansion);
        wrapped.push(Token::canonical(TokenKind::DoubleQuotes, span));
        buf.replace_range(start - 1, start + 1, wrapped);
    } else {
        buf.replace_range(start, start + 1, expansion);
    }
    Ok(())
}

fn expand_function_like(
    buf: &mut TokenBuffer,
    ctx: &mut PdContext,
    depth: usize,
    start: usize,
    name: &str,
    def: &MacroDefinition,
    params: Vec<String>,
) -> Result<(), Error> {
    if buf.tokens.get(start + 1).map(|t| t.kind) != Some(TokenKind::LRound) {
        // Bare word reference to a function-like macro: not an invocation.
        buf.advance();
        return Ok(());
    }

    let (mut args, invocation_end) = collect_arguments(buf, start + 2, ctx.file_label)?;
    if params.is_empty() && args.len() == 1 && args[0].is_empty() {
        args.clear();
    }
    if args.len() != params.len() {
        return Err(Error::preprocess(
            format!(
                "macro {name} expects {} argument(s) but got {}",
                params.len(),
                args.len()
            ),
            ctx.file_label,
            buf.tokens[start].span,
        ));
    }

    let mut saved_params = Vec::with_capacity(params.len());
    for (param_name, arg_tokens) in params.iter().zip(args.drain(..)) {
        saved_params.push((param_name.clone(), ctx.macros.bind_temporary(param_name, arg_tokens)));
    }
    let saved_self = ctx.macros.exclude(name);

    let mut body_buf = TokenBuffer::new(def.body.clone());
    let result = process_directives(&mut body_buf, ctx, depth + 1);

    ctx.macros.restore(name, saved_self);
    for (param_name, prev) in saved_params.into_iter().rev() {
        ctx.macros.restore(&param_name, prev);
    }
    result?;

    buf.replace_range(start, invocation_end, body_buf.tokens);
    Ok(())
}

/// Collects one argument per top-level comma starting at `index` (just past
/// the invocation's opening paren), respecting nested parentheses, and
/// returns the arguments plus the index just past the closing paren.
fn collect_arguments(
    buf: &TokenBuffer,
    mut index: usize,
    file_label: &str,
) -> Result<(Vec<Vec<Token>>, usize), Error> {
    let mut args = Vec::new();
    let mut current = Vec::new();
    let mut nested = 0i32;

    loop {
        let Some(tok) = buf.tokens.get(index) else {
            return Err(Error::missing_token(")", Some("(".to_string())));
        };
        match tok.kind {
            TokenKind::LRound => {
                nested += 1;
                current.push(tok.clone());
                index += 1;
            }
            TokenKind::RRound if nested > 0 => {
                nested -= 1;
                current.push(tok.clone());
                index += 1;
            }
            TokenKind::RRound => {
                args.push(std::mem::take(&mut current));
                index += 1;
                break;
            }
            TokenKind::Comma if nested == 0 => {
                args.push(std::mem::take(&mut current));
                index += 1;
            }
            _ => {
                current.push(tok.clone());
                index += 1;
            }
        }
    }
    let _ = file_label;
    Ok((args, index))
}

#[cfg(test)]
mod tests {
    use super::*;
    use armaclass_lex::lex_string;

    fn run(src: &str) -> String {
        let tokens = lex_string(src).unwrap();
        let mut buf = TokenBuffer::new(tokens);
        let mut macros = MacroTable::new();
        let handler = Handler::new();
        let mut ctx = PdContext {
            macros: &mut macros,
            handler: &handler,
            file_label: "<STRING>",
        };
        process_directives(&mut buf, &mut ctx, 0).unwrap();
        buf.tokens.iter().map(|t| t.text.as_str()).collect()
    }

    #[test]
    fn object_like_expansion() {
        assert_eq!(run("#define TEST test\nclass TEST {};"), "class test {};");
    }

    #[test]
    fn function_like_expansion() {
        assert_eq!(
            run("#define EXP(x) x * x\nclass t {v = EXP(2);};"),
            "class t {v = 2 * 2;};"
        );
    }

    #[test]
    fn paste_keeps_tokens_adjacent() {
        assert_eq!(run("#define DOUBLES(a,b) a##_##b\nDOUBLES(acex,main)"), "acex_main");
    }

    #[test]
    fn nested_function_like_macros() {
        assert_eq!(
            run("#define A(x) a_##x\n#define B(x) b_##x\nA(B(y))"),
            "a_b_y"
        );
    }

    #[test]
    fn ifdef_else_picks_defined_branch() {
        let out = run("#define TEST\n#ifdef TEST\n#define A a\n#else\n#define A b\n#endif\nclass A {};");
        assert_eq!(out, "class a {};");
    }

    #[test]
    fn ifndef_picks_else_when_defined() {
        let out = run("#define TEST\n#ifndef TEST\n#define A a\n#else\n#define A b\n#endif\nclass A {};");
        assert_eq!(out, "class b {};");
    }

    #[test]
    fn stringification() {
        assert_eq!(run("#define QUOTE(v) #v\nQUOTE(hello world)"), "\"hello world\"");
    }

    #[test]
    fn undef_makes_name_plain_again() {
        assert_eq!(run("#define M X\n#undef M\nM"), "M");
    }

    #[test]
    fn self_referential_macro_does_not_loop() {
        assert_eq!(run("#define X X\nX"), "X");
    }

    #[test]
    fn nested_conditional_inside_skipped_branch_does_not_confuse_outer_else() {
        let src = "#define OUTER\n#ifdef OUTER\n#ifdef INNER\n#define A inner\n#else\n#define A skipped\n#endif\n#else\n#define A outer_else\n#endif\nclass A {};";
        assert_eq!(run(src), "class skipped {};");
    }

    #[test]
    fn nested_conditional_inside_outer_skip_branch_does_not_confuse_outer_else() {
        let src = "#ifdef UNDEF1\n#ifdef UNDEF2\n#define A wrong\n#endif\n#else\n#define A right\n#endif\nclass A {};";
        assert_eq!(run(src), "class right {};");
    }
}
