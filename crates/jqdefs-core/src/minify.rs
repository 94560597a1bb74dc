//! In-place canonicalization of parsed definitions.
//!
//! Minification rewrites a definition into the smallest equivalent tree the
//! evaluator accepts:
//! - argument-less terms that compile to a plain function reference
//!   (`.`, `..`, `null`, `true`, `false`, `name`, `$var`) collapse into
//!   [`Query::func`];
//! - parenthesized queries without suffixes are replaced by their content.
//!
//! Minifying twice is the same as minifying once.

use crate::ast::*;

impl FuncDef {
    pub fn minify(&mut self) {
        self.body.minify();
    }
}

impl Query {
    pub fn minify(&mut self) {
        for def in &mut self.func_defs {
            def.minify();
        }

        if let Some(term) = self.term.as_deref_mut() {
            if let Some(name) = term.as_func_name() {
                self.term = None;
                self.func = name;
            } else if let Some(inner) = term.take_parenthesized() {
                let mut func_defs = std::mem::take(&mut self.func_defs);
                *self = inner;
                func_defs.append(&mut self.func_defs);
                self.func_defs = func_defs;
                self.minify();
            } else {
                term.minify();
            }
            return;
        }

        if let Some(left) = self.left.as_deref_mut() {
            left.minify();
        }
        if let Some(right) = self.right.as_deref_mut() {
            right.minify();
        }
    }
}

impl Term {
    /// Function name this term is equivalent to, if it is a bare reference.
    fn as_func_name(&self) -> Option<String> {
        if !self.suffix_list.is_empty() {
            return None;
        }
        let name = match self.kind {
            TermKind::Identity => ".",
            TermKind::Recurse => "..",
            TermKind::Null => "null",
            TermKind::True => "true",
            TermKind::False => "false",
            TermKind::Func => {
                let func = self.func.as_deref()?;
                if !func.args.is_empty() {
                    return None;
                }
                func.name.as_str()
            }
            _ => return None,
        };
        Some(name.to_string())
    }

    fn take_parenthesized(&mut self) -> Option<Query> {
        if self.kind != TermKind::Query || !self.suffix_list.is_empty() {
            return None;
        }
        self.query.take().map(|query| *query)
    }

    pub fn minify(&mut self) {
        if let Some(index) = self.index.as_deref_mut() {
            index.minify();
        }
        if let Some(func) = self.func.as_deref_mut() {
            for arg in &mut func.args {
                arg.minify();
            }
        }
        if let Some(object) = self.object.as_deref_mut() {
            for kv in &mut object.key_vals {
                kv.minify();
            }
        }
        if let Some(query) = self.array.as_deref_mut().and_then(|a| a.query.as_deref_mut()) {
            query.minify();
        }
        if let Some(unary) = self.unary.as_deref_mut() {
            unary.term.minify();
        }
        if let Some(str) = self.str.as_deref_mut() {
            str.minify();
        }
        if let Some(cond) = self.conditional.as_deref_mut() {
            cond.minify();
        }
        if let Some(try_catch) = self.try_catch.as_deref_mut() {
            try_catch.body.minify();
            if let Some(catch) = try_catch.catch.as_deref_mut() {
                catch.minify();
            }
        }
        if let Some(reduce) = self.reduce.as_deref_mut() {
            reduce.term.minify();
            reduce.pattern.minify();
            reduce.start.minify();
            reduce.update.minify();
        }
        if let Some(foreach) = self.foreach.as_deref_mut() {
            foreach.term.minify();
            foreach.pattern.minify();
            foreach.start.minify();
            foreach.update.minify();
            if let Some(extract) = foreach.extract.as_deref_mut() {
                extract.minify();
            }
        }
        if let Some(label) = self.label.as_deref_mut() {
            label.body.minify();
        }
        if let Some(query) = self.query.as_deref_mut() {
            query.minify();
        }
        for suffix in &mut self.suffix_list {
            if let Some(index) = suffix.index.as_deref_mut() {
                index.minify();
            }
            if let Some(bind) = suffix.bind.as_deref_mut() {
                for pattern in &mut bind.patterns {
                    pattern.minify();
                }
                bind.body.minify();
            }
        }
    }
}

impl Index {
    fn minify(&mut self) {
        if let Some(str) = self.str.as_deref_mut() {
            str.minify();
        }
        if let Some(start) = self.start.as_deref_mut() {
            start.minify();
        }
        if let Some(end) = self.end.as_deref_mut() {
            end.minify();
        }
    }
}

impl StringLit {
    fn minify(&mut self) {
        for query in &mut self.queries {
            query.minify();
        }
    }
}

impl ObjectKeyVal {
    fn minify(&mut self) {
        if let Some(key_string) = self.key_string.as_deref_mut() {
            key_string.minify();
        }
        if let Some(key_query) = self.key_query.as_deref_mut() {
            key_query.minify();
        }
        if let Some(val) = self.val.as_deref_mut() {
            val.minify();
        }
    }
}

impl If {
    fn minify(&mut self) {
        self.cond.minify();
        self.then.minify();
        for elif in &mut self.elif {
            elif.cond.minify();
            elif.then.minify();
        }
        if let Some(else_branch) = self.else_branch.as_deref_mut() {
            else_branch.minify();
        }
    }
}

impl Pattern {
    fn minify(&mut self) {
        for pattern in &mut self.array {
            pattern.minify();
        }
        for entry in &mut self.object {
            if let Some(key_string) = entry.key_string.as_deref_mut() {
                key_string.minify();
            }
            if let Some(key_query) = entry.key_query.as_deref_mut() {
                key_query.minify();
            }
            if let Some(val) = entry.val.as_deref_mut() {
                val.minify();
            }
        }
    }
}
