mod util;

use ordered_float::NotNan;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Exp};
use rand_pcg::Pcg64;
use std::collections::VecDeque;
use timeshare::serial::*;
use timeshare::SimState;

type Time = NotNan<f64>;

fn at(time: f64) -> Time {
    NotNan::new(time).expect("event times should never be NaN")
}

/// Data storage for individual customer
struct Customer {
    service_time_random_draw: f64,
    arrival_time: f64,
}

/// Single-server store, measured both per customer and through the time-average hook
struct Store {
    service_rate: f64,
    server_busy: bool,
    arrival_distr: Exp<f64>,
    customer_queue: VecDeque<Customer>,
    customers_served: usize,
    total_time_in_queue: f64,
    area_busy: f64,
    area_queue_length: f64,
    complete: bool,
    rng: Pcg64,
}

impl Store {
    fn new(service_rate: f64, rng: Pcg64) -> Self {
        Self {
            service_rate,
            server_busy: false,
            arrival_distr: Exp::new(4.0).unwrap(),
            customer_queue: VecDeque::new(),
            customers_served: 0,
            total_time_in_queue: 0.0,
            area_busy: 0.0,
            area_queue_length: 0.0,
            complete: false,
            rng,
        }
    }

    fn gen_arrival_delay(&mut self) -> f64 {
        self.arrival_distr.sample(&mut self.rng)
    }
}

impl SimState<Time> for Store {
    fn is_complete(&self, _: &Time) -> bool {
        self.complete
    }

    fn update_time_averages(&mut self, event_queue: &EventQueue<Self, Time>) {
        let elapsed = event_queue.time_since_last_event().into_inner();
        if self.server_busy {
            self.area_busy += elapsed;
        }
        self.area_queue_length += self.customer_queue.len() as f64 * elapsed;
    }
}

/// Customer enters the store
#[derive(Debug)]
struct ArrivalEvent {}

impl ArrivalEvent {
    fn schedule(store: &mut Store, events: &mut EventQueue<Store, Time>) {
        let arrival_time = store.gen_arrival_delay() + events.current_time().into_inner();
        events
            .schedule(Self {}, at(arrival_time))
            .expect("arrival delay should always be a positive number");
    }
}

impl OkEvent<Store, Time> for ArrivalEvent {
    fn execute(&mut self, store: &mut Store, event_queue: &mut EventQueue<Store, Time>) {
        let customer = Customer {
            service_time_random_draw: store.rng.random(),
            arrival_time: event_queue.current_time().into_inner(),
        };

        if store.server_busy {
            store.customer_queue.push_back(customer);
        } else {
            store.server_busy = true;
            ServiceEvent::schedule(customer, store, event_queue);
        }

        Self::schedule(store, event_queue);
    }
}

/// Customer departs the store
#[derive(Debug)]
struct ServiceEvent {}

impl ServiceEvent {
    fn schedule(customer: Customer, store: &mut Store, events: &mut EventQueue<Store, Time>) {
        let now = events.current_time().into_inner();
        store.total_time_in_queue += now - customer.arrival_time;

        let service_delay = customer.service_time_random_draw.ln() / -store.service_rate;
        events
            .schedule(Self {}, at(now + service_delay))
            .expect("service delay should always be positive");
    }
}

impl OkEvent<Store, Time> for ServiceEvent {
    fn execute(&mut self, store: &mut Store, event_queue: &mut EventQueue<Store, Time>) {
        store.customers_served += 1;

        match store.customer_queue.pop_front() {
            Some(next_customer) => Self::schedule(next_customer, store, event_queue),
            None => store.server_busy = false,
        }
    }
}

/// Mark simulation as complete and add time in queue for customers who haven't reached the counter yet
#[derive(Debug)]
struct EndEvent {}

impl OkEvent<Store, Time> for EndEvent {
    fn execute(&mut self, store: &mut Store, event_queue: &mut EventQueue<Store, Time>) {
        store.complete = true;

        let now = event_queue.current_time().into_inner();
        for customer in store.customer_queue.iter() {
            store.total_time_in_queue += now - customer.arrival_time;
        }
    }
}

fn run_sim(seed: u64, service_rate: f64) -> Store {
    let rng = Pcg64::seed_from_u64(seed);
    let mut sim = Simulation::new(Store::new(service_rate, rng), at(0.0));
    sim.schedule(EndEvent {}, at(540.0)).expect("end time should be positive");
    let (store, event_queue) = sim.parts_mut();
    ArrivalEvent::schedule(store, event_queue);

    sim.run().expect("simulation should complete normally");

    assert_eq!(at(540.0), *sim.event_queue().current_time(), "unexpected end time");
    sim.into_state()
}

#[test]
fn queue_area_matches_summed_waits() {
    let store = run_sim(11434450237083315284, 6.0);
    assert!(store.customers_served > 0, "someone should have been served");
    assert_floats_near_equal!(
        store.total_time_in_queue,
        store.area_queue_length,
        "time-averaged queue length should integrate to the total time spent waiting"
    );
}

#[test]
fn utilization_tracks_offered_load() {
    let store = run_sim(7082446179938253086, 6.0);
    let utilization = store.area_busy / 540.0;
    assert!(
        (0.0..=1.0).contains(&utilization),
        "utilization {utilization} outside of [0, 1]"
    );
    // arrival rate 4 against service rate 6
    assert!(
        (0.5..0.85).contains(&utilization),
        "utilization {utilization} too far from the offered load of 2/3"
    );
}

#[test]
fn same_seed_same_run() {
    let first = run_sim(13009076887838060007, 6.0);
    let second = run_sim(13009076887838060007, 6.0);
    assert_eq!(first.customers_served, second.customers_served, "runs should be reproducible");
    assert_eq!(first.total_time_in_queue, second.total_time_in_queue, "runs should be reproducible");
    assert_eq!(first.area_busy, second.area_busy, "runs should be reproducible");
}
