//! In-memory repositories for use-case and router tests

use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use roomctl_core::{
    Booking, BookingPatch, Employee, EmployeePatch, Equipment, EquipmentPatch, EquipmentStatus,
    NewBooking, NewEmployee, NewEquipment, NewRoom, NewUser, Room, RoomPatch, User, UserPatch,
};

use crate::db::{
    BookingRepository, DbError, EmployeeRepository, EquipmentRepository, RoomRepository,
    UserRepository,
};
use crate::http::AppState;
use crate::usecases::{BookingService, EmployeeService, EquipmentService, RoomService, UserService};

/// Vec-backed store; `fail()` makes every later call return a pool error.
pub struct MemoryStore<T> {
    rows: Mutex<Vec<T>>,
    next_id: AtomicI32,
    failing: AtomicBool,
}

impl<T: Clone> MemoryStore<T> {
    pub fn new() -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            next_id: AtomicI32::new(1),
            failing: AtomicBool::new(false),
        }
    }

    pub fn fail(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), DbError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(DbError::Sqlx(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }

    fn next_id(&self) -> i32 {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }

    fn insert(&self, row: T) -> Result<T, DbError> {
        self.check()?;
        self.rows.lock().unwrap().push(row.clone());
        Ok(row)
    }

    fn find(&self, pred: impl Fn(&T) -> bool) -> Result<Option<T>, DbError> {
        self.check()?;
        Ok(self.rows.lock().unwrap().iter().find(|r| pred(*r)).cloned())
    }

    fn filter(&self, pred: impl Fn(&T) -> bool) -> Result<Vec<T>, DbError> {
        self.check()?;
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|r| pred(*r))
            .cloned()
            .collect())
    }

    fn modify(
        &self,
        resource: &'static str,
        id: impl ToString,
        pred: impl Fn(&T) -> bool,
        apply: impl FnOnce(&mut T),
    ) -> Result<T, DbError> {
        self.check()?;
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|r| pred(&**r))
            .ok_or_else(|| DbError::not_found(resource, id))?;
        apply(row);
        Ok(row.clone())
    }

    fn remove(&self, pred: impl Fn(&T) -> bool) -> Result<(), DbError> {
        self.check()?;
        self.rows.lock().unwrap().retain(|r| !pred(r));
        Ok(())
    }
}

fn set<V>(field: &mut V, value: Option<V>) {
    if let Some(v) = value {
        *field = v;
    }
}

#[async_trait]
impl UserRepository for MemoryStore<User> {
    async fn create(&self, user: NewUser) -> Result<User, DbError> {
        let now = Utc::now();
        self.insert(User {
            id: self.next_id(),
            email: user.email,
            password: user.password,
            role: user.role,
            status: user.status,
            created_at: now,
            updated_at: now,
        })
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<User>, DbError> {
        self.find(|u| u.id == id)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DbError> {
        self.find(|u| u.email == email)
    }

    async fn find_all(&self) -> Result<Vec<User>, DbError> {
        self.filter(|_| true)
    }

    async fn update(&self, id: i32, patch: UserPatch) -> Result<User, DbError> {
        self.modify("user", id, |u| u.id == id, |u| {
            set(&mut u.email, patch.email);
            set(&mut u.password, patch.password);
            set(&mut u.role, patch.role);
            set(&mut u.status, patch.status);
            u.updated_at = Utc::now();
        })
    }

    async fn delete(&self, id: i32) -> Result<(), DbError> {
        self.remove(|u| u.id == id)
    }
}

#[async_trait]
impl EmployeeRepository for MemoryStore<Employee> {
    async fn create(&self, e: NewEmployee) -> Result<Employee, DbError> {
        let now = Utc::now();
        self.insert(Employee {
            id: self.next_id(),
            user_id: e.user_id,
            name: e.name,
            last_name: e.last_name,
            email: e.email,
            phone: e.phone,
            address: e.address,
            position: e.position,
            created_at: now,
            updated_at: now,
        })
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Employee>, DbError> {
        self.find(|e| e.id == id)
    }

    async fn find_by_user_id(&self, user_id: i32) -> Result<Option<Employee>, DbError> {
        self.find(|e| e.user_id == user_id)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Employee>, DbError> {
        self.find(|e| e.email == email)
    }

    async fn find_all(&self) -> Result<Vec<Employee>, DbError> {
        self.filter(|_| true)
    }

    async fn update(&self, id: i32, patch: EmployeePatch) -> Result<Employee, DbError> {
        self.modify("employee", id, |e| e.id == id, |e| {
            set(&mut e.name, patch.name);
            set(&mut e.last_name, patch.last_name);
            set(&mut e.email, patch.email);
            set(&mut e.phone, patch.phone);
            set(&mut e.address, patch.address);
            set(&mut e.position, patch.position);
            e.updated_at = Utc::now();
        })
    }

    async fn delete(&self, id: i32) -> Result<(), DbError> {
        self.remove(|e| e.id == id)
    }
}

#[async_trait]
impl BookingRepository for MemoryStore<Booking> {
    async fn create(&self, b: NewBooking) -> Result<Booking, DbError> {
        let now = Utc::now();
        self.insert(Booking {
            id: self.next_id(),
            user_id: b.user_id,
            title: b.title,
            description: b.description,
            start_time: b.start_time,
            end_time: b.end_time,
            status: b.status,
            created_at: now,
            updated_at: now,
        })
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Booking>, DbError> {
        self.find(|b| b.id == id)
    }

    async fn find_by_user_id(&self, user_id: i32) -> Result<Vec<Booking>, DbError> {
        self.filter(|b| b.user_id == user_id)
    }

    async fn find_all(&self) -> Result<Vec<Booking>, DbError> {
        self.filter(|_| true)
    }

    async fn update(&self, id: i32, patch: BookingPatch) -> Result<Booking, DbError> {
        self.modify("booking", id, |b| b.id == id, |b| {
            set(&mut b.title, patch.title);
            if patch.description.is_some() {
                b.description = patch.description;
            }
            set(&mut b.start_time, patch.start_time);
            set(&mut b.end_time, patch.end_time);
            set(&mut b.status, patch.status);
            b.updated_at = Utc::now();
        })
    }

    async fn delete(&self, id: i32) -> Result<(), DbError> {
        self.remove(|b| b.id == id)
    }
}

#[async_trait]
impl EquipmentRepository for MemoryStore<Equipment> {
    async fn create(&self, e: NewEquipment) -> Result<Equipment, DbError> {
        let now = Utc::now();
        self.insert(Equipment {
            id: Uuid::new_v4(),
            name: e.name,
            description: e.description,
            equipment_type: e.equipment_type,
            status: e.status,
            created_at: now,
            updated_at: now,
        })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Equipment>, DbError> {
        self.find(|e| e.id == id)
    }

    async fn find_all(&self) -> Result<Vec<Equipment>, DbError> {
        self.filter(|_| true)
    }

    async fn find_by_status(&self, status: EquipmentStatus) -> Result<Vec<Equipment>, DbError> {
        self.filter(|e| e.status == status)
    }

    async fn update(&self, id: Uuid, patch: EquipmentPatch) -> Result<Equipment, DbError> {
        self.modify("equipment", id, |e| e.id == id, |e| {
            set(&mut e.name, patch.name);
            if patch.description.is_some() {
                e.description = patch.description;
            }
            set(&mut e.equipment_type, patch.equipment_type);
            set(&mut e.status, patch.status);
            e.updated_at = Utc::now();
        })
    }

    async fn delete(&self, id: Uuid) -> Result<(), DbError> {
        self.remove(|e| e.id == id)
    }
}

#[async_trait]
impl RoomRepository for MemoryStore<Room> {
    async fn create(&self, r: NewRoom) -> Result<Room, DbError> {
        let now = Utc::now();
        self.insert(Room {
            id: self.next_id(),
            name: r.name,
            capacity: r.capacity,
            description: r.description,
            status: r.status,
            created_at: now,
            updated_at: now,
        })
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Room>, DbError> {
        self.find(|r| r.id == id)
    }

    async fn find_all(&self) -> Result<Vec<Room>, DbError> {
        self.filter(|_| true)
    }

    async fn update(&self, id: i32, patch: RoomPatch) -> Result<Room, DbError> {
        self.modify("room", id, |r| r.id == id, |r| {
            set(&mut r.name, patch.name);
            set(&mut r.capacity, patch.capacity);
            if patch.description.is_some() {
                r.description = patch.description;
            }
            set(&mut r.status, patch.status);
            r.updated_at = Utc::now();
        })
    }

    async fn delete(&self, id: i32) -> Result<(), DbError> {
        self.remove(|r| r.id == id)
    }
}

/// Router state over empty in-memory stores.
pub fn memory_state() -> AppState {
    AppState {
        users: UserService::new(Arc::new(MemoryStore::<User>::new())),
        employees: EmployeeService::new(Arc::new(MemoryStore::<Employee>::new())),
        bookings: BookingService::new(Arc::new(MemoryStore::<Booking>::new())),
        equipment: EquipmentService::new(Arc::new(MemoryStore::<Equipment>::new())),
        rooms: RoomService::new(Arc::new(MemoryStore::<Room>::new())),
    }
}
