//! Grammar productions.
//!
//! ```text
//! grammar     = header? rule*
//! header      = ("parser" | "lexer")? "grammar" NAME ";"
//! rule        = "fragment"? NAME ARGS? ("returns" ARGS)? ("locals" ARGS)? ":" alts ";"
//! alts        = alternative ("|" alternative)*
//! alternative = options? element* lexer_cmds? ("#" NAME)?
//! element     = (NAME ("=" | "+="))? atom suffix?
//! atom        = rule_ref ARGS? options? | TOKEN options? | LITERAL (".." LITERAL | options?)
//!             | "." options? | "~" atom | "(" alts ")" | CHARSET | ACTION | ACTION "?" options?
//! options     = "<" NAME ("=" value)? ("," NAME ("=" value)?)* ">"
//! ```

use super::core::Parser;
use super::syntax_kind::SyntaxKind;
use super::syntax_kind::token_sets::{
    ALT_END, ELEMENT_FIRST, OPTION_VALUE, RULE_NAME, RULE_RECOVERY, SUFFIXES,
};
use crate::diagnostics::DiagnosticKind;
use crate::tree::{NodeId, NodeKind, OptionValue};

impl Parser<'_> {
    pub(super) fn parse_grammar(&mut self) -> NodeId {
        let start = self.mark();
        let root = self.start_node(NodeKind::Grammar);
        self.parse_header(root);

        let rules_start = self.mark();
        let rules = self.start_node(NodeKind::Rules);
        self.tree.add_child(root, rules);
        while !self.should_stop() {
            if self.at_any(RULE_NAME) || self.at(SyntaxKind::KwFragment) {
                let rule = self.parse_rule();
                self.tree.add_child(rules, rule);
            } else {
                self.error_and_bump(DiagnosticKind::UnexpectedToken, "expected a rule definition");
            }
        }
        self.finish_node(rules, rules_start);
        self.finish_node(root, start);
        root
    }

    pub(super) fn parse_single_rule(&mut self) -> NodeId {
        let rule = self.parse_rule();
        while !self.should_stop() {
            self.error_and_bump(DiagnosticKind::UnexpectedToken, "expected end of input after rule");
        }
        rule
    }

    fn parse_header(&mut self, root: NodeId) {
        match (self.current(), self.nth(1)) {
            (SyntaxKind::KwParser | SyntaxKind::KwLexer, SyntaxKind::KwGrammar) => {
                let token = self.bump();
                let kind = self.token_str(token).to_owned();
                self.tree.set_option(root, "type", OptionValue::Id(kind));
            }
            (SyntaxKind::KwGrammar, _) => {}
            _ => return,
        }
        self.bump();

        if self.at_any(RULE_NAME) {
            let name = self.bump();
            let span = self.token_span(name);
            let text = self.token_str(name);
            self.tree.set_token(root, name, span);
            self.tree.set_text(root, text);
        } else {
            self.error(DiagnosticKind::ExpectedGrammarName);
        }
        self.expect(SyntaxKind::Semicolon, DiagnosticKind::ExpectedSemicolon);
    }

    pub(super) fn parse_rule(&mut self) -> NodeId {
        let start = self.mark();
        let rule = self.start_node(NodeKind::Rule);
        if self.eat(SyntaxKind::KwFragment).is_some() {
            self.tree.set_option(rule, "fragment", OptionValue::Flag);
        }

        let named = self.at_any(RULE_NAME);
        if named {
            let name = self.bump();
            let id = self.token_node(NodeKind::Id, name);
            self.tree.add_child(rule, id);
            let span = self.token_span(name);
            let text = self.token_str(name);
            self.tree.set_token(rule, name, span);
            self.tree.set_text(rule, text);
        } else {
            self.error_recover(DiagnosticKind::ExpectedRuleName, RULE_RECOVERY);
        }

        if named {
            self.parse_rule_prequel(rule);
        }

        if self.eat(SyntaxKind::Colon).is_none() {
            if named {
                self.error(DiagnosticKind::ExpectedColon);
            }
            while !self.at_any(RULE_RECOVERY) && !self.should_stop() && !self.at_rule_start() {
                self.bump();
            }
            if self.eat(SyntaxKind::Colon).is_none() {
                self.eat(SyntaxKind::Semicolon);
                self.finish_node(rule, start);
                return rule;
            }
        }

        let body_start = self.mark();
        let block = self.start_node(NodeKind::Block);
        self.parse_alts_into(block);
        self.finish_node(block, body_start);
        self.tree.add_child(rule, block);

        self.expect(SyntaxKind::Semicolon, DiagnosticKind::ExpectedSemicolon);
        self.finish_node(rule, start);
        rule
    }

    /// `[args]`, `returns [...]` and `locals [...]` between the name and `:`.
    fn parse_rule_prequel(&mut self, rule: NodeId) {
        if self.at(SyntaxKind::BracketAction) {
            let args = self.leaf(NodeKind::ArgAction);
            self.tree.add_child(rule, args);
        }
        for (keyword, kind) in [
            (SyntaxKind::KwReturns, NodeKind::Returns),
            (SyntaxKind::KwLocals, NodeKind::Locals),
        ] {
            if self.eat(keyword).is_none() {
                continue;
            }
            match self.eat(SyntaxKind::BracketAction) {
                Some(token) => {
                    let node = self.token_node(kind, token);
                    self.tree.add_child(rule, node);
                }
                None => self.error(DiagnosticKind::ExpectedAttributes),
            }
        }
    }

    /// A name followed by what can only continue a rule header.
    fn at_rule_start(&mut self) -> bool {
        if self.at(SyntaxKind::KwFragment) {
            return true;
        }
        if !self.at_any(RULE_NAME) {
            return false;
        }
        let header_follow = |kind| {
            matches!(
                kind,
                SyntaxKind::Colon | SyntaxKind::KwReturns | SyntaxKind::KwLocals
            )
        };
        match self.nth(1) {
            SyntaxKind::BracketAction => header_follow(self.nth(2)),
            kind => header_follow(kind),
        }
    }

    fn parse_alts_into(&mut self, block: NodeId) {
        loop {
            let alt = self.parse_alternative();
            self.tree.add_child(block, alt);
            if self.eat(SyntaxKind::Pipe).is_none() {
                break;
            }
        }
    }

    fn parse_alternative(&mut self) -> NodeId {
        let start = self.mark();
        let alt = self.start_node(NodeKind::Alt);
        if self.at(SyntaxKind::AngleOpen) {
            let options = self.parse_element_options(alt);
            self.tree.add_child(alt, options);
        }

        let mut has_elements = false;
        loop {
            if self.should_stop()
                || self.at_any(ALT_END)
                || self.at(SyntaxKind::Pound)
                || self.at(SyntaxKind::Arrow)
                || self.at_rule_start()
            {
                break;
            }
            if self.at_any(ELEMENT_FIRST) {
                let element = self.parse_element();
                self.tree.add_child(alt, element);
                has_elements = true;
            } else {
                let text = self.current_text();
                self.error_and_bump(
                    DiagnosticKind::UnexpectedToken,
                    format!("`{text}` is not valid in an alternative"),
                );
            }
        }
        if !has_elements {
            let epsilon = self.start_node(NodeKind::Epsilon);
            self.tree.add_child(alt, epsilon);
        }

        if self.at(SyntaxKind::Arrow) {
            let commands = self.parse_lexer_commands();
            self.tree.add_child(alt, commands);
        }

        if self.eat(SyntaxKind::Pound).is_some() {
            if self.at_any(RULE_NAME) {
                let label = self.bump();
                let text = self.token_str(label).to_owned();
                self.tree.set_alt_label(alt, Some(text));
            } else {
                self.error(DiagnosticKind::ExpectedAltLabel);
            }
        }

        self.finish_node(alt, start);
        alt
    }

    fn parse_element(&mut self) -> NodeId {
        let start = self.mark();
        if !self.enter_recursion() {
            return self.start_node(NodeKind::Epsilon);
        }

        let labeled =
            self.at_any(RULE_NAME) && matches!(self.nth(1), SyntaxKind::Equals | SyntaxKind::PlusEquals);
        let element = if labeled {
            self.parse_labeled_element(start)
        } else {
            match self.parse_atom() {
                Some(atom) => atom,
                None => self.start_node(NodeKind::Epsilon),
            }
        };
        let element = self.parse_ebnf_suffix(element, start);

        self.exit_recursion();
        element
    }

    fn parse_labeled_element(&mut self, start: usize) -> NodeId {
        let label = self.leaf(NodeKind::Id);
        let kind = match self.current() {
            SyntaxKind::PlusEquals => NodeKind::PlusAssign,
            _ => NodeKind::Assign,
        };
        let op = self.bump();
        let assign = self.token_node(kind, op);
        self.tree.add_child(assign, label);
        if let Some(target) = self.parse_atom() {
            self.tree.add_child(assign, target);
        }
        self.finish_node(assign, start);
        assign
    }

    fn parse_atom(&mut self) -> Option<NodeId> {
        let start = self.mark();
        let node = match self.current() {
            SyntaxKind::RuleRefId => {
                let node = self.leaf(NodeKind::RuleRef);
                if self.at(SyntaxKind::BracketAction) {
                    let args = self.leaf(NodeKind::ArgAction);
                    self.tree.add_child(node, args);
                }
                self.parse_optional_element_options(node);
                node
            }
            SyntaxKind::TokenRefId => {
                let node = self.leaf(NodeKind::TokenRef);
                self.parse_optional_element_options(node);
                node
            }
            SyntaxKind::StringLiteral => {
                let literal = self.leaf(NodeKind::StringLiteral);
                if self.at(SyntaxKind::DotDot) {
                    self.parse_range(literal)
                } else {
                    self.parse_optional_element_options(literal);
                    literal
                }
            }
            SyntaxKind::Dot => {
                let node = self.leaf(NodeKind::Wildcard);
                self.parse_optional_element_options(node);
                node
            }
            SyntaxKind::Tilde => {
                let node = self.leaf(NodeKind::Not);
                if self.enter_recursion() {
                    if let Some(operand) = self.parse_atom() {
                        self.tree.add_child(node, operand);
                    }
                    self.exit_recursion();
                }
                node
            }
            SyntaxKind::ParenOpen => self.parse_subrule(),
            SyntaxKind::BracketAction => self.leaf(NodeKind::CharSet),
            SyntaxKind::Action => {
                let action = self.bump();
                if self.raw_current() == SyntaxKind::Question {
                    self.bump_raw();
                    let pred = self.token_node(NodeKind::SemPred, action);
                    self.parse_optional_element_options(pred);
                    pred
                } else {
                    self.token_node(NodeKind::Action, action)
                }
            }
            _ => {
                self.error(DiagnosticKind::ExpectedElement);
                return None;
            }
        };
        self.finish_node(node, start);
        Some(node)
    }

    fn parse_range(&mut self, from: NodeId) -> NodeId {
        let range = self.leaf(NodeKind::Range);
        self.tree.add_child(range, from);
        if self.at(SyntaxKind::StringLiteral) {
            let to = self.leaf(NodeKind::StringLiteral);
            self.tree.add_child(range, to);
        } else {
            self.error(DiagnosticKind::ExpectedElement);
        }
        range
    }

    fn parse_subrule(&mut self) -> NodeId {
        let start = self.mark();
        let open = self.current_span();
        let block = self.leaf(NodeKind::Block);
        self.parse_alts_into(block);
        if self.eat(SyntaxKind::ParenClose).is_none() {
            self.error_unclosed_delimiter(DiagnosticKind::UnclosedBlock, "block opened here", open);
        }
        self.finish_node(block, start);
        block
    }

    fn parse_ebnf_suffix(&mut self, element: NodeId, start: usize) -> NodeId {
        if !self.at_any(SUFFIXES) || self.tree.kind(element).is_epsilon() {
            return element;
        }
        let (kind, greedy) = match self.current() {
            SyntaxKind::Question => (NodeKind::Optional, true),
            SyntaxKind::Star => (NodeKind::Closure, true),
            SyntaxKind::Plus => (NodeKind::PositiveClosure, true),
            SyntaxKind::QuestionQuestion => (NodeKind::Optional, false),
            SyntaxKind::StarQuestion => (NodeKind::Closure, false),
            _ => (NodeKind::PositiveClosure, false),
        };
        let wrapper = self.leaf(kind);
        self.tree.add_child(wrapper, element);
        if !greedy {
            self.tree
                .set_option(wrapper, "greedy", OptionValue::Id("false".to_owned()));
        }
        self.finish_node(wrapper, start);
        wrapper
    }

    fn parse_optional_element_options(&mut self, target: NodeId) {
        if self.at(SyntaxKind::AngleOpen) {
            let options = self.parse_element_options(target);
            self.tree.add_child(target, options);
        }
    }

    /// Parses `<k=v, ...>`, storing each entry in `target`'s option map.
    fn parse_element_options(&mut self, target: NodeId) -> NodeId {
        let start = self.mark();
        let open = self.current_span();
        let options = self.leaf(NodeKind::ElementOptions);
        loop {
            if !self.at_any(RULE_NAME) {
                self.error(DiagnosticKind::ExpectedOptionName);
                break;
            }
            let option_start = self.mark();
            let key = self.bump();
            let option = self.token_node(NodeKind::ElementOption, key);
            let value = if self.eat(SyntaxKind::Equals).is_some() {
                self.parse_option_value(option)
            } else {
                OptionValue::Flag
            };
            self.finish_node(option, option_start);
            self.tree.add_child(options, option);
            let key = self.token_str(key);
            self.tree.set_option(target, key, value);

            if self.eat(SyntaxKind::Comma).is_none() {
                break;
            }
        }
        if self.eat(SyntaxKind::AngleClose).is_none() {
            self.error_unclosed_delimiter(
                DiagnosticKind::UnclosedElementOptions,
                "options opened here",
                open,
            );
        }
        self.finish_node(options, start);
        options
    }

    fn parse_option_value(&mut self, option: NodeId) -> OptionValue {
        if !self.at_any(OPTION_VALUE) {
            self.error(DiagnosticKind::ExpectedOptionValue);
            return OptionValue::Flag;
        }
        let kind = self.current();
        let token = self.bump();
        let text = self.token_str(token);
        let (node_kind, value) = match kind {
            SyntaxKind::Int => match text.parse::<u32>() {
                Ok(n) => (NodeKind::Int, OptionValue::Int(n)),
                Err(_) => (NodeKind::Int, OptionValue::Id(text.to_owned())),
            },
            SyntaxKind::StringLiteral => (NodeKind::StringLiteral, OptionValue::Str(text.to_owned())),
            _ => (NodeKind::Id, OptionValue::Id(text.to_owned())),
        };
        let node = self.token_node(node_kind, token);
        self.tree.add_child(option, node);
        value
    }

    fn parse_lexer_commands(&mut self) -> NodeId {
        let start = self.mark();
        let commands = self.leaf(NodeKind::LexerCommands);
        loop {
            if !self.current().is_identifier() {
                self.error_msg(DiagnosticKind::ExpectedElement, "lexer command");
                break;
            }
            let command_start = self.mark();
            let command = self.leaf(NodeKind::Id);
            if self.eat(SyntaxKind::ParenOpen).is_some() {
                if self.current().is_identifier() || self.at(SyntaxKind::Int) {
                    let kind = if self.at(SyntaxKind::Int) {
                        NodeKind::Int
                    } else {
                        NodeKind::Id
                    };
                    let arg = self.leaf(kind);
                    self.tree.add_child(command, arg);
                }
                if self.eat(SyntaxKind::ParenClose).is_none() {
                    self.error_msg(DiagnosticKind::UnexpectedToken, "expected `)`");
                }
            }
            self.finish_node(command, command_start);
            self.tree.add_child(commands, command);

            if self.eat(SyntaxKind::Comma).is_none() {
                break;
            }
        }
        self.finish_node(commands, start);
        commands
    }
}
