//! 구독 가능한 단일 값.
//!
//! 쓰기는 즉시 메모리에 반영되고 구독자에게 변경 알림이 간다.
//! 소유 컴포넌트만 `set`/`update` 를 호출하고 외부에는 읽기와 구독만 노출한다.

use tokio::sync::watch;

#[derive(Debug)]
pub struct Observable<T> {
    tx: watch::Sender<T>,
}

impl<T> Observable<T> {
    pub fn new(initial: T) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    /// 현재 값을 빌려 클로저에 넘긴다. 클로저 안에서 쓰기를 하면 교착된다.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.tx.borrow())
    }

    /// 값을 교체한다. 구독자가 없어도 성공한다.
    pub fn set(&self, value: T) {
        self.tx.send_replace(value);
    }

    /// 제자리에서 값을 수정하고 구독자에게 알린다.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        self.tx.send_modify(f);
    }

    /// 변경 알림을 받는 수신자를 만든다.
    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.tx.subscribe()
    }
}

impl<T: Clone> Observable<T> {
    pub fn get(&self) -> T {
        self.tx.borrow().clone()
    }
}

impl<T: PartialEq> Observable<T> {
    /// 값이 실제로 달라졌을 때만 교체하고 알린다. 바뀌었으면 true.
    pub fn set_if_changed(&self, value: T) -> bool {
        self.tx.send_if_modified(|current| {
            if *current == value {
                false
            } else {
                *current = value;
                true
            }
        })
    }
}

impl<T: Default> Default for Observable<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subscriber_sees_latest_value() {
        let value = Observable::new(1);
        let mut rx = value.subscribe();
        value.set(2);
        value.update(|v| *v += 1);
        assert!(rx.has_changed().expect("sender alive"));
        assert_eq!(*rx.borrow_and_update(), 3);
        assert_eq!(value.get(), 3);
    }

    #[test]
    fn equal_value_does_not_notify() {
        let value = Observable::new("a");
        let rx = value.subscribe();
        assert!(!value.set_if_changed("a"));
        assert!(!rx.has_changed().expect("sender alive"));
        assert!(value.set_if_changed("b"));
        assert!(rx.has_changed().expect("sender alive"));
    }
}
