//! Lane queues and the vehicle store
//!
//! Vehicles live in one id-keyed map; each (road, lane) queue only holds
//! ids in arrival order. "The vehicle ahead of me" is the previous id in
//! the same queue.

use log::debug;
use std::collections::{BTreeMap, HashMap, VecDeque};

use super::types::{LaneKey, Road, SimId, VehicleId};
use super::vehicle::SimVehicle;

/// FIFO of vehicle ids for one lane. The front is nearest the stop line.
#[derive(Debug, Clone, Default)]
pub struct LaneQueue {
    ids: VecDeque<VehicleId>,
    capacity: Option<usize>,
}

impl LaneQueue {
    pub fn new(capacity: Option<usize>) -> Self {
        Self {
            ids: VecDeque::new(),
            capacity,
        }
    }

    pub fn is_full(&self) -> bool {
        self.capacity.is_some_and(|cap| self.ids.len() >= cap)
    }

    /// Append to the tail. Returns false, leaving the queue untouched, when full.
    pub fn enqueue(&mut self, id: VehicleId) -> bool {
        if self.is_full() {
            return false;
        }
        self.ids.push_back(id);
        true
    }

    /// Remove the head. No-op on an empty queue.
    pub fn dequeue(&mut self) -> Option<VehicleId> {
        self.ids.pop_front()
    }

    /// Remove an id from anywhere in the queue, keeping the others in order
    pub fn remove(&mut self, id: VehicleId) -> bool {
        match self.ids.iter().position(|queued| *queued == id) {
            Some(index) => self.ids.remove(index).is_some(),
            None => false,
        }
    }

    pub fn front(&self) -> Option<VehicleId> {
        self.ids.front().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Ids from head to tail
    pub fn iter(&self) -> impl Iterator<Item = VehicleId> + '_ {
        self.ids.iter().copied()
    }

    fn clear(&mut self) {
        self.ids.clear();
    }
}

/// All lane queues of the intersection plus the vehicles they reference
#[derive(Debug, Default)]
pub struct QueueStore {
    /// BTreeMap keeps iteration order stable: road A lane 0 first
    lanes: BTreeMap<LaneKey, LaneQueue>,
    vehicles: HashMap<VehicleId, SimVehicle>,
    next_id: usize,
}

impl QueueStore {
    /// Create `lanes_per_road` empty queues for each of the four roads
    pub fn new(lanes_per_road: usize, capacity: Option<usize>) -> Self {
        let mut lanes = BTreeMap::new();
        for road in Road::ALL {
            for lane in 0..lanes_per_road {
                lanes.insert(LaneKey::new(road, lane), LaneQueue::new(capacity));
            }
        }
        Self {
            lanes,
            vehicles: HashMap::new(),
            next_id: 0,
        }
    }

    /// Allocate the id the next enqueued vehicle should carry
    pub fn next_vehicle_id(&mut self) -> VehicleId {
        let id = VehicleId(SimId(self.next_id));
        self.next_id += 1;
        id
    }

    /// Append a vehicle to the tail of its lane
    ///
    /// Returns false and drops the vehicle when the lane is full or does
    /// not exist. Callers must not assume delivery.
    pub fn enqueue(&mut self, key: LaneKey, vehicle: SimVehicle) -> bool {
        let Some(queue) = self.lanes.get_mut(&key) else {
            debug!("Dropping vehicle {:?}: no lane {:?}", vehicle.id, key);
            return false;
        };
        if !queue.enqueue(vehicle.id) {
            debug!("Dropping vehicle {:?}: lane {:?} is full", vehicle.id, key);
            return false;
        }
        self.vehicles.insert(vehicle.id, vehicle);
        true
    }

    /// Remove and discard the head of a lane. No-op on an empty lane.
    pub fn dequeue(&mut self, key: LaneKey) -> Option<SimVehicle> {
        let id = self.lanes.get_mut(&key)?.dequeue()?;
        self.vehicles.remove(&id)
    }

    /// Remove a vehicle from anywhere in its lane
    pub fn remove(&mut self, key: LaneKey, id: VehicleId) -> Option<SimVehicle> {
        let queue = self.lanes.get_mut(&key)?;
        if !queue.remove(id) {
            return None;
        }
        self.vehicles.remove(&id)
    }

    pub fn front(&self, key: LaneKey) -> Option<&SimVehicle> {
        let id = self.lanes.get(&key)?.front()?;
        self.vehicles.get(&id)
    }

    pub fn is_empty(&self, key: LaneKey) -> bool {
        self.lanes.get(&key).map_or(true, LaneQueue::is_empty)
    }

    pub fn len(&self, key: LaneKey) -> usize {
        self.lanes.get(&key).map_or(0, LaneQueue::len)
    }

    pub fn lane(&self, key: LaneKey) -> Option<&LaneQueue> {
        self.lanes.get(&key)
    }

    pub fn lane_keys(&self) -> Vec<LaneKey> {
        self.lanes.keys().copied().collect()
    }

    pub fn vehicle(&self, id: VehicleId) -> Option<&SimVehicle> {
        self.vehicles.get(&id)
    }

    pub fn vehicle_mut(&mut self, id: VehicleId) -> Option<&mut SimVehicle> {
        self.vehicles.get_mut(&id)
    }

    /// Vehicles of one lane, head first
    pub fn lane_vehicles(&self, key: LaneKey) -> Vec<&SimVehicle> {
        self.lanes
            .get(&key)
            .map(|queue| queue.iter().filter_map(|id| self.vehicles.get(&id)).collect())
            .unwrap_or_default()
    }

    /// Every queued vehicle, lane by lane, head first
    pub fn vehicles(&self) -> impl Iterator<Item = &SimVehicle> + '_ {
        self.lanes
            .values()
            .flat_map(move |queue| queue.iter().filter_map(move |id| self.vehicles.get(&id)))
    }

    pub fn vehicle_count(&self) -> usize {
        self.vehicles.len()
    }

    /// Release every queued vehicle. Returns how many were released.
    pub fn clear(&mut self) -> usize {
        let released = self.vehicles.len();
        for queue in self.lanes.values_mut() {
            queue.clear();
        }
        self.vehicles.clear();
        released
    }
}
