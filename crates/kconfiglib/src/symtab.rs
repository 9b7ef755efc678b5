//! Symbol table and value resolution.
//!
//! [`Kconfig::load`] parses a Kconfig tree (following `source` statements) and flattens it into
//! a table of [`Symbol`]s in definition order. Conditions from enclosing `if` blocks, menus,
//! and choices are attached to each symbol's prompts and defaults as they are collected, so
//! resolution never needs to revisit the block structure.
//!
//! [`Kconfig::load_config`] overlays user selections from a `.config` file, and
//! [`Kconfig::str_values`] computes the final string value of every symbol.

use {
    crate::{
        dotconfig::{load_dotconfig, DotConfigValue, CONFIG_PREFIX},
        parser::{
            Block, Choice, Config, Expr, KConfigError, KconfigFile, LitValue, LocExpr, Located, Source, Tristate, Type,
        },
        Context,
    },
    indexmap::IndexMap,
    std::{
        collections::HashSet,
        env::VarError,
        path::{Path, PathBuf},
    },
};

/// A defined configuration symbol.
#[derive(Clone, Debug)]
pub struct Symbol {
    name: String,
    r#type: Type,
    user_value: Option<String>,
    env_value: Option<String>,
    visibility: Vec<Vec<LocExpr>>,
    defaults: Vec<SymbolDefault>,
    ranges: Vec<SymbolRange>,
    selected_by: Vec<SelectEdge>,
}

/// A default for a symbol, with the full set of conditions gating it.
///
/// The conditions include everything propagated from enclosing blocks and `depends on`
/// statements as well as the default's own `if` clause. The default applies when every
/// condition evaluates above `n`.
#[derive(Clone, Debug)]
struct SymbolDefault {
    value: LocExpr,
    conditions: Vec<LocExpr>,
}

#[derive(Clone, Debug)]
struct SymbolRange {
    start: LitValue,
    end: LitValue,
    conditions: Vec<LocExpr>,
}

/// A reverse dependency: `selector` names a symbol whose `select` statement targets this
/// symbol.
#[derive(Clone, Debug)]
struct SelectEdge {
    selector: String,
    conditions: Vec<LocExpr>,
}

impl Symbol {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            r#type: Type::Unknown,
            user_value: None,
            env_value: None,
            visibility: Vec::new(),
            defaults: Vec::new(),
            ranges: Vec::new(),
            selected_by: Vec::new(),
        }
    }

    /// The name of the symbol, without the `CONFIG_` prefix.
    #[inline(always)]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The type of the symbol.
    #[inline(always)]
    pub fn r#type(&self) -> Type {
        self.r#type
    }

    /// The value assigned to the symbol by a loaded `.config` file, if any.
    ///
    /// This is the raw assignment; it only takes effect if the symbol is visible.
    #[inline(always)]
    pub fn user_value(&self) -> Option<&str> {
        self.user_value.as_deref()
    }

    fn type_default(&self) -> String {
        if self.r#type.is_bool_like() {
            "n".to_string()
        } else {
            String::new()
        }
    }
}

/// A loaded Kconfig tree.
#[derive(Debug)]
pub struct Kconfig {
    symbols: IndexMap<String, Symbol>,
    mainmenu: Option<String>,
}

impl Kconfig {
    /// Load the Kconfig tree rooted at `filename`.
    ///
    /// `source` statements are followed as they are encountered; non-relative filenames are
    /// resolved against `base_dir`. `${VAR}` references in source filenames and `option env=`
    /// symbols are looked up through `context`.
    pub fn load<C>(filename: &Path, base_dir: &Path, context: &C) -> Result<Self, KConfigError>
    where
        C: Context,
    {
        let file = KconfigFile::parse_filename(filename, base_dir)?;
        Self::from_file(&file, base_dir, context)
    }

    /// Load a Kconfig tree from content that was read from `filename`.
    pub fn load_str<C>(filename: &Path, base_dir: &Path, data: &str, context: &C) -> Result<Self, KConfigError>
    where
        C: Context,
    {
        let file = KconfigFile::parse_str(filename, base_dir, data)?;
        Self::from_file(&file, base_dir, context)
    }

    fn from_file<C>(file: &KconfigFile, base_dir: &Path, context: &C) -> Result<Self, KConfigError>
    where
        C: Context,
    {
        let mut walker = Walker {
            context,
            base_dir: base_dir.to_path_buf(),
            symbols: IndexMap::new(),
            mainmenu: None,
            selects: Vec::new(),
        };

        walker.walk_blocks(&file.blocks, &[], &[])?;
        walker.apply_selects();

        Ok(Self {
            symbols: walker.symbols,
            mainmenu: walker.mainmenu,
        })
    }

    /// The `mainmenu` title, if the tree declares one.
    pub fn mainmenu(&self) -> Option<&str> {
        self.mainmenu.as_deref()
    }

    /// Look up a symbol by name (without the `CONFIG_` prefix).
    pub fn get(&self, name: &str) -> Option<&Symbol> {
        self.symbols.get(name)
    }

    /// Iterate over all defined symbols in definition order.
    pub fn symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.values()
    }

    /// Load user selections from the `.config` file at `filename`.
    ///
    /// Assignments to symbols that are not defined in the tree are logged and skipped, as are
    /// `is not set` entries for symbols that are not bool or tristate.
    pub fn load_config(&mut self, filename: &Path) -> Result<(), KConfigError> {
        let values = load_dotconfig(filename)?;
        self.apply_dotconfig(filename, values);
        Ok(())
    }

    fn apply_dotconfig(&mut self, filename: &Path, values: IndexMap<String, DotConfigValue>) {
        for (name, value) in values {
            let Some(symbol) = self.symbols.get_mut(&name) else {
                log::warn!("{}: unknown symbol {CONFIG_PREFIX}{name}", filename.display());
                continue;
            };

            match value {
                DotConfigValue::Set(value) => symbol.user_value = Some(value),

                DotConfigValue::NotSet if symbol.r#type.is_bool_like() => {
                    symbol.user_value = Some("n".to_string());
                }

                DotConfigValue::NotSet => {
                    log::warn!(
                        "{}: {CONFIG_PREFIX}{name} is {}, not bool or tristate; ignoring \"is not set\"",
                        filename.display(),
                        symbol.r#type,
                    );
                }
            }
        }
    }

    /// Set the user value for a symbol, replacing any previous user value.
    ///
    /// Returns false if the symbol is not defined in the tree.
    pub fn set_user_value(&mut self, name: &str, value: impl Into<String>) -> bool {
        match self.symbols.get_mut(name) {
            Some(symbol) => {
                symbol.user_value = Some(value.into());
                true
            }
            None => false,
        }
    }

    /// Resolve the string value of a single symbol.
    ///
    /// Returns `None` if the symbol is not defined.
    pub fn str_value(&self, name: &str) -> Option<String> {
        if !self.symbols.contains_key(name) {
            return None;
        }

        let mut resolver = Resolver::new(&self.symbols);
        Some(resolver.str_value(name))
    }

    /// Resolve the string value of every defined symbol, in definition order.
    ///
    /// Bool and tristate symbols always resolve to `y`, `m`, or `n`. String, int, and hex
    /// symbols resolve to the empty string when no user value or default applies.
    pub fn str_values(&self) -> IndexMap<String, String> {
        let mut resolver = Resolver::new(&self.symbols);

        self.symbols.keys().map(|name| (name.clone(), resolver.str_value(name))).collect()
    }
}

/// Collects symbols from the block tree, reading sourced files as they are encountered.
struct Walker<'ctx, C> {
    context: &'ctx C,
    base_dir: PathBuf,
    symbols: IndexMap<String, Symbol>,
    mainmenu: Option<String>,

    /// Select edges seen during the walk: (target, selector, conditions). These are applied
    /// after the walk so that forward references to not-yet-defined targets work.
    selects: Vec<(String, SelectEdge)>,
}

impl<C> Walker<'_, C>
where
    C: Context,
{
    /// Walk a block list, collecting symbols.
    ///
    /// `conditions` gate everything defined below this point. `prompt_conditions` come from
    /// `visible if` lines on enclosing menus and gate only the prompts, so user values are
    /// rejected while defaults still apply.
    fn walk_blocks(
        &mut self,
        blocks: &[Block],
        conditions: &[LocExpr],
        prompt_conditions: &[LocExpr],
    ) -> Result<(), KConfigError> {
        for block in blocks {
            match block {
                Block::Choice(choice) => self.add_choice(choice, conditions, prompt_conditions)?,

                Block::Comment(_) => (),

                Block::Config(config) | Block::MenuConfig(config) => {
                    self.add_config(config, conditions, prompt_conditions)?
                }

                Block::If(if_block) => {
                    let mut inner = conditions.to_vec();
                    inner.push(if_block.condition.clone());
                    self.walk_blocks(&if_block.items, &inner, prompt_conditions)?;
                }

                Block::Mainmenu(title) => self.mainmenu = Some(title.as_str().to_string()),

                Block::Menu(menu) => {
                    let mut inner = conditions.to_vec();
                    inner.extend(menu.depends_on.iter().cloned());

                    let mut inner_prompt = prompt_conditions.to_vec();
                    inner_prompt.extend(menu.visibility.iter().cloned());

                    self.walk_blocks(&menu.blocks, &inner, &inner_prompt)?;
                }

                Block::Source(source) => self.walk_source(source, conditions, prompt_conditions)?,
            }
        }

        Ok(())
    }

    fn walk_source(
        &mut self,
        source: &Source,
        conditions: &[LocExpr],
        prompt_conditions: &[LocExpr],
    ) -> Result<(), KConfigError> {
        let path = source.resolve_path(self.context)?;

        if source.optional && !path.is_file() {
            log::debug!("Skipping optional source {}", path.display());
            return Ok(());
        }

        log::debug!("Sourcing {}", path.display());
        let file = KconfigFile::parse_filename(&path, &self.base_dir)?;
        self.walk_blocks(&file.blocks, conditions, prompt_conditions)
    }

    fn add_config(
        &mut self,
        config: &Config,
        conditions: &[LocExpr],
        prompt_conditions: &[LocExpr],
    ) -> Result<(), KConfigError> {
        let name = config.name.as_str();

        // Conditions that gate everything defined at this site.
        let mut site = conditions.to_vec();
        site.extend(config.depends_on.iter().cloned());

        let env_value = match &config.env {
            None => None,
            Some(var) => match self.context.var(var.as_str()) {
                Ok(value) => Some(value),
                Err(VarError::NotPresent) => {
                    log::warn!("{}: environment variable {} is not set", var.location(), var.as_str());
                    None
                }
                Err(VarError::NotUnicode(_)) => {
                    return Err(KConfigError::invalid_env(var.as_str(), var.location()));
                }
            },
        };

        let symbol = self.symbols.entry(name.to_string()).or_insert_with(|| Symbol::new(name));

        if symbol.r#type == Type::Unknown {
            symbol.r#type = config.r#type;
        } else if config.r#type != Type::Unknown && config.r#type != symbol.r#type {
            log::warn!(
                "{}: symbol {name} redefined with type {}, keeping {}",
                config.name.location(),
                config.r#type,
                symbol.r#type
            );
        }

        if env_value.is_some() {
            symbol.env_value = env_value;
        }

        if let Some(prompt) = &config.prompt {
            let mut visibility = site.clone();
            visibility.extend(prompt_conditions.iter().cloned());
            visibility.extend(prompt.condition.iter().cloned());
            symbol.visibility.push(visibility);
        }

        for default in &config.defaults {
            let mut default_conditions = site.clone();
            default_conditions.extend(default.condition.iter().cloned());
            symbol.defaults.push(SymbolDefault {
                value: default.value.clone(),
                conditions: default_conditions,
            });
        }

        for range in &config.ranges {
            let mut range_conditions = site.clone();
            range_conditions.extend(range.condition.iter().cloned());
            symbol.ranges.push(SymbolRange {
                start: range.start.value.clone(),
                end: range.end.value.clone(),
                conditions: range_conditions,
            });
        }

        for select in &config.selects {
            let mut select_conditions = site.clone();
            select_conditions.extend(select.condition.iter().cloned());
            self.selects.push((
                select.target_name.as_str().to_string(),
                SelectEdge {
                    selector: name.to_string(),
                    conditions: select_conditions,
                },
            ));
        }

        Ok(())
    }

    fn add_choice(
        &mut self,
        choice: &Choice,
        conditions: &[LocExpr],
        prompt_conditions: &[LocExpr],
    ) -> Result<(), KConfigError> {
        let mut site = conditions.to_vec();
        site.extend(choice.depends_on.iter().cloned());

        for config in &choice.configs {
            self.add_config(config, &site, prompt_conditions)?;
        }

        if choice.defaults.is_empty() {
            // Without an explicit default, the first member is the default selection.
            if !choice.optional {
                if let Some(first) = choice.configs.first() {
                    let name = first.name.as_str();
                    let location = first.name.location();

                    let Some(symbol) = self.symbols.get_mut(name) else {
                        unreachable!("choice member was just added");
                    };

                    symbol.defaults.push(SymbolDefault {
                        value: LocExpr::new(Expr::Symbol("y".to_string()), location),
                        conditions: site,
                    });
                }
            }

            return Ok(());
        }

        for default in &choice.defaults {
            let target = default.target.as_str();

            let Some(symbol) = self.symbols.get_mut(target) else {
                log::warn!("{}: choice default {target} is not a choice member", default.target.location());
                continue;
            };

            let mut default_conditions = site.clone();
            default_conditions.extend(default.condition.iter().cloned());
            symbol.defaults.push(SymbolDefault {
                value: LocExpr::new(Expr::Symbol("y".to_string()), default.target.location()),
                conditions: default_conditions,
            });
        }

        Ok(())
    }

    fn apply_selects(&mut self) {
        for (target, edge) in self.selects.drain(..) {
            let Some(symbol) = self.symbols.get_mut(&target) else {
                log::warn!("Symbol {} selects undefined symbol {target}", edge.selector);
                continue;
            };

            symbol.selected_by.push(edge);
        }
    }
}

/// Computes symbol values, memoizing results and breaking dependency cycles.
struct Resolver<'a> {
    symbols: &'a IndexMap<String, Symbol>,
    cache: IndexMap<String, String>,
    active: HashSet<String>,
}

impl<'a> Resolver<'a> {
    fn new(symbols: &'a IndexMap<String, Symbol>) -> Self {
        Self {
            symbols,
            cache: IndexMap::new(),
            active: HashSet::new(),
        }
    }

    /// The resolved string value of a defined symbol.
    fn str_value(&mut self, name: &str) -> String {
        if let Some(value) = self.cache.get(name) {
            return value.clone();
        }

        let Some(symbol) = self.symbols.get(name) else {
            panic!("str_value called for undefined symbol {name}");
        };

        if !self.active.insert(name.to_string()) {
            log::warn!("Recursive dependency on symbol {name}");
            return symbol.type_default();
        }

        let value = self.compute(symbol);

        self.active.remove(name);
        self.cache.insert(name.to_string(), value.clone());
        value
    }

    fn compute(&mut self, symbol: &'a Symbol) -> String {
        if let Some(env_value) = &symbol.env_value {
            return env_value.clone();
        }

        if symbol.r#type.is_bool_like() {
            self.compute_tristate(symbol).to_string()
        } else {
            self.compute_string(symbol)
        }
    }

    fn compute_tristate(&mut self, symbol: &'a Symbol) -> Tristate {
        let visibility = self.visibility(symbol);

        let mut value = Tristate::False;

        if let (Some(user), true) = (&symbol.user_value, visibility != Tristate::False) {
            // The user value cannot exceed the visibility.
            value = Tristate::from_str_value(user).min(visibility);
        } else if let Some((default, condition)) = self.active_default(symbol) {
            value = self.eval_tristate(&default.value.expr).min(condition);
        }

        // Reverse dependencies from select statements force a lower bound.
        for edge in &symbol.selected_by {
            let strength = self.selector_strength(edge);
            value = value.max(strength);
        }

        if symbol.r#type == Type::Bool && value == Tristate::Maybe {
            value = Tristate::True;
        }

        value
    }

    fn compute_string(&mut self, symbol: &'a Symbol) -> String {
        let visibility = self.visibility(symbol);

        let mut value = if let (Some(user), true) = (&symbol.user_value, visibility != Tristate::False) {
            user.clone()
        } else if let Some((default, _)) = self.active_default(symbol) {
            self.eval_string(&default.value.expr, symbol.r#type)
        } else {
            String::new()
        };

        if matches!(symbol.r#type, Type::Int | Type::Hex) {
            value = self.clamp_to_range(symbol, value);
        }

        value
    }

    /// The visibility of a symbol: the strongest prompt whose conditions hold.
    fn visibility(&mut self, symbol: &'a Symbol) -> Tristate {
        symbol
            .visibility
            .iter()
            .map(|conditions| self.eval_conditions(conditions))
            .max()
            .unwrap_or(Tristate::False)
    }

    /// The first default whose conditions hold, along with the condition value.
    fn active_default(&mut self, symbol: &'a Symbol) -> Option<(&'a SymbolDefault, Tristate)> {
        for default in &symbol.defaults {
            let condition = self.eval_conditions(&default.conditions);
            if condition != Tristate::False {
                return Some((default, condition));
            }
        }

        None
    }

    fn selector_strength(&mut self, edge: &SelectEdge) -> Tristate {
        let selector_value = match self.symbols.get(&edge.selector) {
            Some(selector) if selector.r#type.is_bool_like() => {
                Tristate::from_str_value(&self.str_value(&edge.selector))
            }
            _ => return Tristate::False,
        };

        selector_value.min(self.eval_conditions(&edge.conditions))
    }

    /// Evaluate a condition list as the AND of its entries. An empty list is `y`.
    fn eval_conditions(&mut self, conditions: &[LocExpr]) -> Tristate {
        conditions.iter().map(|c| self.eval_tristate(&c.expr)).min().unwrap_or(Tristate::True)
    }

    fn eval_tristate(&mut self, expr: &Expr) -> Tristate {
        match expr {
            Expr::Symbol(name) => match self.symbols.get(name) {
                Some(symbol) if symbol.r#type.is_bool_like() => {
                    let value = self.str_value(name);
                    Tristate::from_str_value(&value)
                }

                // Defined non-boolean symbols are n in a tristate context.
                Some(_) => Tristate::False,

                // Undefined symbols act as constants: y, m, and n have their tristate
                // values, everything else is n.
                None => Tristate::from_str_value(name),
            },

            Expr::Str(s) => Tristate::from_str_value(s),

            Expr::Integer(_) => Tristate::False,

            Expr::Not(e) => self.eval_tristate(&e.expr).not(),

            Expr::And(a, b) => self.eval_tristate(&a.expr).min(self.eval_tristate(&b.expr)),

            Expr::Or(a, b) => self.eval_tristate(&a.expr).max(self.eval_tristate(&b.expr)),

            Expr::Eq(a, b) => (self.operand(a) == self.operand(b)).into(),

            Expr::Ne(a, b) => (self.operand(a) != self.operand(b)).into(),

            Expr::Lt(a, b) => self.compare(a, b, |o| o.is_lt()),
            Expr::Le(a, b) => self.compare(a, b, |o| o.is_le()),
            Expr::Gt(a, b) => self.compare(a, b, |o| o.is_gt()),
            Expr::Ge(a, b) => self.compare(a, b, |o| o.is_ge()),
        }
    }

    /// Evaluate an expression as a string value, for string/int/hex defaults.
    ///
    /// Boolean operators produce their tristate value as `y`, `m`, or `n`.
    fn eval_string(&mut self, expr: &Expr, r#type: Type) -> String {
        match expr {
            Expr::Symbol(name) => {
                if self.symbols.contains_key(name) {
                    self.str_value(name)
                } else {
                    // Undefined symbols act as string constants.
                    name.clone()
                }
            }

            Expr::Str(s) => s.clone(),

            Expr::Integer(i) => format_number(*i, r#type),

            _ => self.eval_tristate(expr).to_string(),
        }
    }

    /// The string value of a comparison operand.
    fn operand(&mut self, expr: &LocExpr) -> String {
        self.eval_string(&expr.expr, Type::Unknown)
    }

    /// Ordered comparison. Numeric when both operands parse as integers, lexicographic
    /// otherwise.
    fn compare(&mut self, a: &LocExpr, b: &LocExpr, accept: impl Fn(std::cmp::Ordering) -> bool) -> Tristate {
        let a = self.operand(a);
        let b = self.operand(b);

        let ordering = match (parse_number(&a), parse_number(&b)) {
            (Some(a), Some(b)) => a.cmp(&b),
            _ => a.cmp(&b),
        };

        accept(ordering).into()
    }

    /// Clamp an int/hex value to the first range whose conditions hold.
    fn clamp_to_range(&mut self, symbol: &'a Symbol, value: String) -> String {
        let Some(number) = parse_number(&value) else {
            return value;
        };

        for range in &symbol.ranges {
            if self.eval_conditions(&range.conditions) == Tristate::False {
                continue;
            }

            let (Some(start), Some(end)) = (self.bound(&range.start), self.bound(&range.end)) else {
                return value;
            };

            if number < start {
                return format_number(start, symbol.r#type);
            } else if number > end {
                return format_number(end, symbol.r#type);
            }

            return value;
        }

        value
    }

    /// The numeric value of a range bound.
    fn bound(&mut self, value: &LitValue) -> Option<i64> {
        match value {
            LitValue::Int(i) => Some(*i),
            LitValue::String(s) => parse_number(s),
            LitValue::Symbol(name) if self.symbols.contains_key(name) => parse_number(&self.str_value(name)),
            LitValue::Symbol(name) => parse_number(name),
            LitValue::Tristate(_) => None,
        }
    }
}

fn parse_number(s: &str) -> Option<i64> {
    let s = s.trim();

    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        i64::from_str_radix(hex, 16).ok()
    } else {
        s.parse().ok()
    }
}

fn format_number(value: i64, r#type: Type) -> String {
    if r#type == Type::Hex {
        format!("{value:#x}")
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use {
        crate::{parse_dotconfig, Kconfig, SystemContext, Type},
        std::{collections::HashMap, path::Path},
        test_log::test,
    };

    fn load(data: &str) -> Kconfig {
        Kconfig::load_str(Path::new("Kconfig"), Path::new("."), data, &SystemContext).unwrap()
    }

    #[test]
    fn bool_default() {
        let kconfig = load(
            r#"
config FOO
    bool "Foo"
    default y

config BAR
    bool "Bar"
"#,
        );

        assert_eq!(kconfig.str_value("FOO").unwrap(), "y");
        assert_eq!(kconfig.str_value("BAR").unwrap(), "n");
    }

    #[test]
    fn user_value_overrides_default() {
        let mut kconfig = load(
            r#"
config FOO
    bool "Foo"
    default y
"#,
        );

        kconfig.set_user_value("FOO", "n");
        assert_eq!(kconfig.str_value("FOO").unwrap(), "n");
    }

    #[test]
    fn invisible_symbol_ignores_user_value() {
        let mut kconfig = load(
            r#"
config GATE
    bool "Gate"

config FOO
    bool "Foo"
    depends on GATE
    default y
"#,
        );

        // GATE is n, so FOO is invisible and its default is suppressed too.
        kconfig.set_user_value("FOO", "y");
        assert_eq!(kconfig.str_value("FOO").unwrap(), "n");

        kconfig.set_user_value("GATE", "y");
        assert_eq!(kconfig.str_value("FOO").unwrap(), "y");
    }

    #[test]
    fn promptless_symbol_ignores_user_value() {
        let mut kconfig = load(
            r#"
config HIDDEN
    bool
    default n
"#,
        );

        kconfig.set_user_value("HIDDEN", "y");
        assert_eq!(kconfig.str_value("HIDDEN").unwrap(), "n");
    }

    #[test]
    fn not_set_applies_only_to_bool_like_symbols() {
        let mut kconfig = load(
            r#"
config NAME
    string "Name"
    default "widget"

config FLAG
    bool "Flag"
    default y
"#,
        );

        let values = parse_dotconfig(
            Path::new(".config"),
            "# CONFIG_NAME is not set\n# CONFIG_FLAG is not set\n",
        )
        .unwrap();
        kconfig.apply_dotconfig(Path::new(".config"), values);

        assert_eq!(kconfig.str_value("NAME").unwrap(), "widget");
        assert_eq!(kconfig.str_value("FLAG").unwrap(), "n");
    }

    #[test]
    fn if_block_condition_propagates() {
        let kconfig = load(
            r#"
config PLATFORM
    bool "Platform"

if PLATFORM
config FEATURE
    bool "Feature"
    default y
endif
"#,
        );

        assert_eq!(kconfig.str_value("FEATURE").unwrap(), "n");
    }

    #[test]
    fn menu_depends_propagate() {
        let mut kconfig = load(
            r#"
config TOP
    bool "Top"

menu "Sub"
    depends on TOP

config NESTED
    bool "Nested"
    default y
endmenu
"#,
        );

        assert_eq!(kconfig.str_value("NESTED").unwrap(), "n");

        kconfig.set_user_value("TOP", "y");
        assert_eq!(kconfig.str_value("NESTED").unwrap(), "y");
    }

    #[test]
    fn menu_visible_if_gates_member_prompts() {
        let mut kconfig = load(
            r#"
config SHOW
    bool "Show advanced"

menu "Advanced"
    visible if SHOW

config TWEAK
    bool "Tweak"
    default y
endmenu
"#,
        );

        // The menu is hidden, so the user value is rejected but the default still applies.
        kconfig.set_user_value("TWEAK", "n");
        assert_eq!(kconfig.str_value("TWEAK").unwrap(), "y");

        kconfig.set_user_value("SHOW", "y");
        assert_eq!(kconfig.str_value("TWEAK").unwrap(), "n");
    }

    #[test]
    fn select_forces_value() {
        let kconfig = load(
            r#"
config DRIVER
    bool "Driver"
    default y
    select LIBRARY

config LIBRARY
    bool "Library"
"#,
        );

        assert_eq!(kconfig.str_value("LIBRARY").unwrap(), "y");
    }

    #[test]
    fn conditional_select() {
        let kconfig = load(
            r#"
config A
    bool "A"
    default y
    select B if C

config B
    bool "B"

config C
    bool "C"
"#,
        );

        // C is n, so the select does not apply.
        assert_eq!(kconfig.str_value("B").unwrap(), "n");
    }

    #[test]
    fn tristate_values() {
        let mut kconfig = load(
            r#"
config MOD
    tristate "Module"
    default m

config FORCED
    bool "Forced"
    default m
"#,
        );

        assert_eq!(kconfig.str_value("MOD").unwrap(), "m");

        // m promotes to y for a bool symbol.
        assert_eq!(kconfig.str_value("FORCED").unwrap(), "y");

        kconfig.set_user_value("MOD", "y");
        assert_eq!(kconfig.str_value("MOD").unwrap(), "y");
    }

    #[test]
    fn string_and_int_defaults() {
        let kconfig = load(
            r#"
config NAME
    string "Name"
    default "hello"

config COUNT
    int "Count"
    default 42

config ADDR
    hex "Address"
    default 0x1000

config EMPTY
    string "Empty"
"#,
        );

        assert_eq!(kconfig.str_value("NAME").unwrap(), "hello");
        assert_eq!(kconfig.str_value("COUNT").unwrap(), "42");
        assert_eq!(kconfig.str_value("ADDR").unwrap(), "0x1000");
        assert_eq!(kconfig.str_value("EMPTY").unwrap(), "");
    }

    #[test]
    fn default_references_symbol() {
        let kconfig = load(
            r#"
config BASE
    string "Base"
    default "esp32"

config TARGET
    string "Target"
    default BASE
"#,
        );

        assert_eq!(kconfig.str_value("TARGET").unwrap(), "esp32");
    }

    #[test]
    fn conditional_defaults_first_match_wins() {
        let mut kconfig = load(
            r#"
config MODE
    bool "Mode"

config SPEED
    int "Speed"
    default 100 if MODE
    default 10
"#,
        );

        assert_eq!(kconfig.str_value("SPEED").unwrap(), "10");

        kconfig.set_user_value("MODE", "y");
        assert_eq!(kconfig.str_value("SPEED").unwrap(), "100");
    }

    #[test]
    fn comparison_conditions() {
        let kconfig = load(
            r#"
config TARGET
    string "Target"
    default "esp32"

config IS_ESP32
    bool "Is esp32"
    default y if TARGET = "esp32"

config BIG
    int "Big"
    default 100

config OVER_50
    bool "Over 50"
    default y if BIG > 50
"#,
        );

        assert_eq!(kconfig.str_value("IS_ESP32").unwrap(), "y");
        assert_eq!(kconfig.str_value("OVER_50").unwrap(), "y");
    }

    #[test]
    fn range_clamps_value() {
        let mut kconfig = load(
            r#"
config LEVEL
    int "Level"
    range 1 10
    default 5
"#,
        );

        assert_eq!(kconfig.str_value("LEVEL").unwrap(), "5");

        kconfig.set_user_value("LEVEL", "99");
        assert_eq!(kconfig.str_value("LEVEL").unwrap(), "10");

        kconfig.set_user_value("LEVEL", "0");
        assert_eq!(kconfig.str_value("LEVEL").unwrap(), "1");
    }

    #[test]
    fn choice_defaults() {
        let kconfig = load(
            r#"
choice
    prompt "Pick"

    config FIRST
        bool "First"

    config SECOND
        bool "Second"
endchoice

choice
    prompt "Pick again"
    default B2

    config A2
        bool "A2"

    config B2
        bool "B2"
endchoice
"#,
        );

        // Without an explicit default, the first member is chosen.
        assert_eq!(kconfig.str_value("FIRST").unwrap(), "y");
        assert_eq!(kconfig.str_value("SECOND").unwrap(), "n");

        assert_eq!(kconfig.str_value("A2").unwrap(), "n");
        assert_eq!(kconfig.str_value("B2").unwrap(), "y");
    }

    #[test]
    fn env_option() {
        let context: HashMap<String, String> = [("MY_TARGET".to_string(), "esp32s3".to_string())].into();

        let kconfig = Kconfig::load_str(
            Path::new("Kconfig"),
            Path::new("."),
            r#"
config TARGET_ENV
    string
    option env="MY_TARGET"

config MISSING_ENV
    string
    option env="NO_SUCH_VARIABLE_SET"
"#,
            &context,
        )
        .unwrap();

        assert_eq!(kconfig.str_value("TARGET_ENV").unwrap(), "esp32s3");
        assert_eq!(kconfig.str_value("MISSING_ENV").unwrap(), "");
    }

    #[test]
    fn recursive_dependency_warns_and_defaults() {
        let kconfig = load(
            r#"
config A
    bool "A"
    default B

config B
    bool "B"
    default A
"#,
        );

        assert_eq!(kconfig.str_value("A").unwrap(), "n");
    }

    #[test]
    fn str_values_in_definition_order() {
        let kconfig = load(
            r#"
config ZEBRA
    bool "Zebra"
    default y

config APPLE
    string "Apple"
    default "fruit"

config MIDDLE
    int "Middle"
"#,
        );

        let values = kconfig.str_values();
        let names: Vec<_> = values.keys().map(String::as_str).collect();
        assert_eq!(names, ["ZEBRA", "APPLE", "MIDDLE"]);

        assert_eq!(values["ZEBRA"], "y");
        assert_eq!(values["APPLE"], "fruit");
        assert_eq!(values["MIDDLE"], "");
    }

    #[test]
    fn symbol_accessors() {
        let kconfig = load(
            r#"
mainmenu "Test configuration"

config FOO
    bool "Foo"
"#,
        );

        assert_eq!(kconfig.mainmenu(), Some("Test configuration"));

        let symbol = kconfig.get("FOO").unwrap();
        assert_eq!(symbol.name(), "FOO");
        assert_eq!(symbol.r#type(), Type::Bool);
        assert!(symbol.user_value().is_none());

        assert!(kconfig.get("MISSING").is_none());
        assert!(kconfig.str_value("MISSING").is_none());
    }
}
