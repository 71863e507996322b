use std::collections::{BTreeMap, HashSet};

use chrono::{Datelike, Duration, NaiveDateTime};
use noahs_core::zodiac::{ChineseZodiac, ZodiacSign};
use noahs_core::{Customer, CustomerId, Order, OrderItem, Product};
use regex::Regex;
use tracing::{debug, info, instrument};

use super::{Answer, Edition, EditionParams, ItemRule, NameRule, PriceRule, Puzzle, PuzzleError};
use crate::loader::Dataset;
use crate::pipeline::Frame;
use crate::predicates::{
    ColorVariant, DescriptionMatcher, city, has_generational_suffix, hour_before, initials,
    is_in_store, name_spells_phone, shipped_within, visit_key, zip_code,
};
use crate::reference::ZodiacReference;
use crate::resolve::{ResolveError, resolve_by, resolve_customer};

/// An order line joined to its product and order.
#[derive(Debug, Clone, Copy)]
struct Line<'a> {
    item: &'a OrderItem,
    product: &'a Product,
    order: &'a Order,
}

impl Line<'_> {
    const fn customer_id(&self) -> CustomerId {
        self.order.customer_id
    }
}

enum NameFilter {
    Initials(&'static str),
    Pattern(Regex),
}

impl NameFilter {
    fn new(rule: NameRule) -> Result<Self, regex::Error> {
        Ok(match rule {
            NameRule::Initials(i) => Self::Initials(i),
            NameRule::Pattern(p) => Self::Pattern(Regex::new(p)?),
        })
    }

    fn is_match(&self, name: &str) -> bool {
        match self {
            Self::Initials(i) => initials(name) == *i,
            Self::Pattern(re) => re.is_match(name),
        }
    }
}

fn resolved<T>(puzzle: Puzzle, result: Result<T, ResolveError>) -> Result<T, PuzzleError> {
    result.map_err(|source| PuzzleError::Resolve { puzzle, source })
}

/// Solves one edition's puzzles against a loaded dataset.
///
/// Answers are remembered, so puzzles that build on an earlier one
/// ([`Puzzle::prerequisite`]) can be solved once it is known.
///
/// ```no_run
/// # use noahs_query::loader::Dataset;
/// # use noahs_query::puzzles::{Edition, Puzzle, Solver};
/// # fn demo(data: &Dataset) -> Result<(), noahs_query::puzzles::PuzzleError> {
/// let mut solver = Solver::new(data, Edition::Y5784);
/// let answer = solver.solve(Puzzle::Investigator)?;
/// println!("{}", answer.phone);
/// # Ok(())
/// # }
/// ```
pub struct Solver<'a> {
    data: &'a Dataset,
    edition: Edition,
    params: EditionParams,
    zodiac: Option<ZodiacReference>,
    answers: BTreeMap<Puzzle, Answer>,
}

impl<'a> Solver<'a> {
    /// A solver using `edition`'s parameters.
    #[must_use]
    pub fn new(data: &'a Dataset, edition: Edition) -> Self {
        Self {
            data,
            edition,
            params: edition.params(),
            zodiac: None,
            answers: BTreeMap::new(),
        }
    }

    /// Replace the edition's parameters, e.g. to change the tie-break rule.
    #[must_use]
    pub fn with_params(mut self, params: EditionParams) -> Self {
        self.params = params;
        self
    }

    /// Supply the zodiac data the neighbour puzzle needs.
    #[must_use]
    pub fn with_zodiac(mut self, reference: ZodiacReference) -> Self {
        self.zodiac = Some(reference);
        self
    }

    #[must_use]
    pub const fn edition(&self) -> Edition {
        self.edition
    }

    #[must_use]
    pub const fn params(&self) -> &EditionParams {
        &self.params
    }

    /// The sign and animal to fetch reference data for.
    #[must_use]
    pub const fn zodiac_query(&self) -> (ZodiacSign, ChineseZodiac) {
        (self.params.neighbor.sign, self.params.neighbor.animal)
    }

    /// A previously found answer.
    #[must_use]
    pub fn answer(&self, puzzle: Puzzle) -> Option<&Answer> {
        self.answers.get(&puzzle)
    }

    /// Solve one puzzle.
    ///
    /// # Errors
    ///
    /// Returns [`PuzzleError::MissingPrerequisite`] if the puzzle builds on an
    /// unsolved one, and [`PuzzleError::Resolve`] if its pipeline does not
    /// narrow to one customer.
    #[instrument(skip(self, puzzle), fields(edition = %self.edition, puzzle = puzzle.number()))]
    pub fn solve(&mut self, puzzle: Puzzle) -> Result<Answer, PuzzleError> {
        if let Some(needs) = puzzle.prerequisite()
            && !self.answers.contains_key(&needs)
        {
            return Err(PuzzleError::MissingPrerequisite { puzzle, needs });
        }

        let customer = match puzzle {
            Puzzle::Investigator => self.investigator(),
            Puzzle::Contractor => self.contractor(),
            Puzzle::Neighbor => self.neighbor(),
            Puzzle::EarlyBird => self.early_bird(),
            Puzzle::CatLady => self.cat_lady(),
            Puzzle::BargainHunter => self.bargain_hunter(),
            Puzzle::MeetCute => self.meet_cute(),
            Puzzle::Collector => self.collector(),
        }?;

        let answer = Answer {
            edition: self.edition,
            puzzle: puzzle.number(),
            title: puzzle.title(),
            customer_id: customer.id,
            name: customer.name.clone(),
            phone: customer.phone.clone(),
        };
        info!(
            customer_id = %answer.customer_id,
            phone = %answer.phone,
            "Solved puzzle"
        );
        self.answers.insert(puzzle, answer.clone());
        Ok(answer)
    }

    /// Solve `puzzle` after any puzzles it builds on.
    ///
    /// Returns the answers in solving order, ending with `puzzle`'s.
    ///
    /// # Errors
    ///
    /// Returns the first error along the chain.
    pub fn solve_through(&mut self, puzzle: Puzzle) -> Result<Vec<Answer>, PuzzleError> {
        let mut chain = vec![puzzle];
        while let Some(needs) = chain.last().and_then(|p| p.prerequisite()) {
            chain.push(needs);
        }
        chain.reverse();

        let mut answers = Vec::with_capacity(chain.len());
        for step in chain {
            let known = (step != puzzle)
                .then(|| self.answers.get(&step).cloned())
                .flatten();
            let answer = match known {
                Some(answer) => answer,
                None => self.solve(step)?,
            };
            answers.push(answer);
        }
        Ok(answers)
    }

    /// Solve all eight puzzles in order.
    ///
    /// # Errors
    ///
    /// Returns the first puzzle's error.
    pub fn solve_all(&mut self) -> Result<Vec<Answer>, PuzzleError> {
        Puzzle::ALL.into_iter().map(|p| self.solve(p)).collect()
    }

    // =========================================================================
    // Shared pipelines
    // =========================================================================

    fn customer(&self, id: CustomerId) -> Result<&'a Customer, PuzzleError> {
        self.data.customer(id).ok_or(PuzzleError::UnknownCustomer(id))
    }

    fn answer_customer(&self, puzzle: Puzzle, needs: Puzzle) -> Result<&'a Customer, PuzzleError> {
        let answer = self
            .answers
            .get(&needs)
            .ok_or(PuzzleError::MissingPrerequisite { puzzle, needs })?;
        self.customer(answer.customer_id)
    }

    /// Every order line with its product and order, in line order.
    fn lines(&self) -> Frame<Line<'a>> {
        let data = self.data;
        data.items
            .frame()
            .join(
                data.products.rows(),
                |item| item.sku.clone(),
                |product| product.sku.clone(),
                |item, product| (item, *product),
            )
            .join(
                data.orders.rows(),
                |(item, _)| item.order_id,
                |order| order.id,
                |(item, product), order| Line {
                    item,
                    product,
                    order: *order,
                },
            )
    }

    fn with_customers(&self, lines: Frame<Line<'a>>) -> Frame<(Line<'a>, &'a Customer)> {
        lines.join(
            self.data.customers.rows(),
            Line::customer_id,
            |customer| customer.id,
            |line, customer| (line, *customer),
        )
    }

    /// The customer with the most lines in `lines`.
    fn busiest_customer(
        &self,
        puzzle: Puzzle,
        lines: &Frame<Line<'a>>,
    ) -> Result<&'a Customer, PuzzleError> {
        let id = lines
            .mode(Line::customer_id, self.params.tie_break)
            .ok_or(PuzzleError::Resolve {
                puzzle,
                source: ResolveError::NoMatch,
            })?;
        self.customer(id)
    }

    // =========================================================================
    // Puzzles
    // =========================================================================

    fn investigator(&self) -> Result<&'a Customer, PuzzleError> {
        let frame = self
            .data
            .customers
            .frame()
            .filter(|c| !has_generational_suffix(&c.name))
            .filter(|c| name_spells_phone(&c.name, &c.phone));
        resolved(Puzzle::Investigator, resolve_customer(frame))
    }

    fn contractor(&self) -> Result<&'a Customer, PuzzleError> {
        let p = self.params.contractor;
        let names = NameFilter::new(p.name)?;
        let window = p.shipped_within_secs.map(Duration::seconds);

        let lines = self
            .with_customers(
                self.lines()
                    .filter(|l| l.order.ordered.year() == p.year)
                    .filter(|l| window.is_none_or(|w| shipped_within(l.order, w))),
            )
            .filter(|(_, c)| names.is_match(&c.name));

        let customers: Frame<&'a Customer> = match p.items {
            ItemRule::AnyItem(needles) => {
                let matcher = DescriptionMatcher::any_of(needles);
                lines
                    .filter(|(l, _)| matcher.is_match(&l.product.desc))
                    .map(|(_, c)| c)
            }
            ItemRule::SameVisit(needles) => {
                let matchers: Vec<DescriptionMatcher> =
                    needles.iter().map(|n| DescriptionMatcher::contains(n)).collect();
                lines
                    .group_by(|(l, c)| (c.id, l.order.ordered))
                    .into_iter()
                    .filter(|(_, rows)| {
                        matchers
                            .iter()
                            .all(|m| rows.iter().any(|(l, _)| m.is_match(&l.product.desc)))
                    })
                    .filter_map(|(_, rows)| rows.first().map(|(_, c)| *c))
                    .collect()
            }
        }
        .distinct_by(|c| c.id);
        debug!(rows = customers.len(), "Contractor candidates");
        resolved(Puzzle::Contractor, resolve_customer(customers))
    }

    fn neighbor(&self) -> Result<&'a Customer, PuzzleError> {
        let contractor = self.answer_customer(Puzzle::Neighbor, Puzzle::Contractor)?;
        let p = self.params.neighbor;
        let reference = self
            .zodiac
            .as_ref()
            .filter(|r| r.sign == p.sign && r.animal == p.animal)
            .ok_or(PuzzleError::MissingReference(Puzzle::Neighbor))?;

        let window = reference.birth_window(
            self.data
                .customers
                .rows()
                .iter()
                .map(|c| c.birthdate.year()),
        );
        let zip = zip_code(&contractor.citystatezip);
        debug!(years = ?window.years(), zip, "Neighbor search window");

        let frame = self
            .data
            .customers
            .frame()
            .filter(|c| window.contains(c.birthdate))
            .filter(|c| zip_code(&c.citystatezip) == zip);
        resolved(Puzzle::Neighbor, resolve_customer(frame))
    }

    fn early_bird(&self) -> Result<&'a Customer, PuzzleError> {
        let p = self.params.early_bird;
        let lines = self
            .lines()
            .filter(|l| l.product.sku.in_category(p.category))
            .filter(|l| {
                hour_before(l.order.ordered, p.before_hour)
                    && l.order
                        .shipped
                        .is_some_and(|s| hour_before(s, p.before_hour))
            })
            .filter(|l| p.min_qty.is_none_or(|q| l.item.qty >= q));
        self.busiest_customer(Puzzle::EarlyBird, &lines)
    }

    fn cat_lady(&self) -> Result<&'a Customer, PuzzleError> {
        let p = self.params.cat_lady;
        let matcher = DescriptionMatcher::contains(p.needle);
        let lines = self
            .with_customers(self.lines().filter(|l| matcher.is_match(&l.product.desc)))
            .filter(|(_, c)| p.city.is_none_or(|want| city(&c.citystatezip) == want));

        let id = lines
            .mode(|(_, c)| c.id, self.params.tie_break)
            .ok_or(PuzzleError::Resolve {
                puzzle: Puzzle::CatLady,
                source: ResolveError::NoMatch,
            })?;
        self.customer(id)
    }

    fn bargain_lines(&self) -> Frame<Line<'a>> {
        let lines = self.lines();
        match self.params.bargain {
            PriceRule::BelowCost => {
                lines.filter(|l| l.item.unit_price < l.product.wholesale_cost)
            }
            PriceRule::CheapestLineAtOrBelowCost => lines
                .group_by(|l| (l.item.order_id, l.item.sku.clone()))
                .into_iter()
                .filter_map(|(_, rows)| rows.into_iter().min_by_key(|l| l.item.unit_price))
                .filter(|l| l.item.unit_price <= l.product.wholesale_cost)
                .collect(),
        }
    }

    fn bargain_hunter(&self) -> Result<&'a Customer, PuzzleError> {
        let lines = self.bargain_lines();
        debug!(rows = lines.len(), "Lines sold at or below cost");
        self.busiest_customer(Puzzle::BargainHunter, &lines)
    }

    fn meet_cute(&self) -> Result<&'a Customer, PuzzleError> {
        let hunter = self.answer_customer(Puzzle::MeetCute, Puzzle::BargainHunter)?;
        let granularity = self.params.meet_cute;

        let in_store: Frame<(Line<'a>, ColorVariant<'a>)> = self
            .lines()
            .filter(|l| is_in_store(l.order))
            .into_iter()
            .filter_map(|l| {
                let product: &'a Product = l.product;
                ColorVariant::parse(&product.desc).map(|variant| (l, variant))
            })
            .collect();

        let hunter_ids = HashSet::from([hunter.id]);
        let moment = |(l, v): &(Line<'a>, ColorVariant<'a>)| {
            (v.base, visit_key(l.order.ordered, granularity))
        };
        let moments: HashSet<(&'a str, NaiveDateTime)> = in_store
            .clone()
            .semi_join(&hunter_ids, |(l, _)| l.customer_id())
            .iter()
            .map(moment)
            .collect();
        debug!(moments = moments.len(), "Colour purchases by the bargain hunter");

        let matches = in_store
            .anti_join(&hunter_ids, |(l, _)| l.customer_id())
            .semi_join(&moments, moment)
            .map(|(l, _)| l);

        let frame = self.with_customers(matches);
        resolved(Puzzle::MeetCute, resolve_by(frame, |(_, c)| c.id)).map(|(_, c)| c)
    }

    fn collector(&self) -> Result<&'a Customer, PuzzleError> {
        let desc = self.params.collector.desc;
        let lines = self
            .lines()
            .filter(|l| desc.is_none_or(|d| l.product.desc.contains(d)));
        self.busiest_customer(Puzzle::Collector, &lines)
    }
}
