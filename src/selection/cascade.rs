struct Rule<'a, T> {
    name: &'static str,
    when: Box<dyn Fn() -> bool + 'a>,
    pick: Box<dyn Fn() -> Option<T> + 'a>,
}

/// Ordered list of (predicate, selector) rules. The first rule whose predicate holds
/// and whose selector yields a value wins; a rule that applies but finds nothing
/// passes control to the next one.
pub struct Cascade<'a, T> {
    name: &'static str,
    rules: Vec<Rule<'a, T>>,
}

impl<'a, T> Cascade<'a, T> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            rules: Vec::new(),
        }
    }

    pub fn rule(
        mut self,
        name: &'static str,
        when: impl Fn() -> bool + 'a,
        pick: impl Fn() -> Option<T> + 'a,
    ) -> Self {
        self.rules.push(Rule {
            name,
            when: Box::new(when),
            pick: Box::new(pick),
        });
        self
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|rule| rule.name).collect()
    }

    pub fn resolve_named(&self) -> Option<(&'static str, T)> {
        for rule in &self.rules {
            if !(rule.when)() {
                continue;
            }
            if let Some(value) = (rule.pick)() {
                tracing::debug!(cascade = self.name, rule = rule.name, "cascade resolved");
                return Some((rule.name, value));
            }
        }
        tracing::debug!(cascade = self.name, "cascade found nothing");
        None
    }

    pub fn resolve(&self) -> Option<T> {
        self.resolve_named().map(|(_, value)| value)
    }
}
